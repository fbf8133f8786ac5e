//! Nested lexical binding environments.
//!
//! Each frame maps a name to the list of *candidate definition forms* that
//! might be its value at the point of use: function declarations, variable
//! initializers, assigned right-hand sides, pushed array elements. Branches,
//! reassignment and mutation all accumulate rather than resolve, so the
//! analysis stays path-insensitive by construction.

use std::collections::HashMap;
use tree_sitter::Node;

/// One lexical environment. Innermost frames live at the top of the stack.
#[derive(Debug, Default)]
pub struct ScopeFrame<'t> {
    bindings: HashMap<String, Vec<Node<'t>>>,
}

/// Stack of frames, innermost last. A fresh one is created per analyzed file
/// with a single module-level frame.
#[derive(Debug)]
pub struct ScopeStack<'t> {
    frames: Vec<ScopeFrame<'t>>,
}

impl<'t> ScopeStack<'t> {
    pub fn new() -> Self {
        Self {
            frames: vec![ScopeFrame::default()],
        }
    }

    /// Entering a function body.
    pub fn push_frame(&mut self) {
        self.frames.push(ScopeFrame::default());
    }

    /// Leaving a function body. The module frame is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Marks `name` as known in the innermost frame without attaching any
    /// code to it. Used for import specifiers: lookups find the name and stop
    /// walking outward, but there is nothing to descend into.
    pub fn declare(&mut self, name: &str) {
        let top = self.frames.len() - 1;
        self.frames[top].bindings.entry(name.to_string()).or_default();
    }

    /// Appends a candidate form for `name` in the innermost frame.
    pub fn bind(&mut self, name: &str, form: Node<'t>) {
        let top = self.frames.len() - 1;
        self.frames[top]
            .bindings
            .entry(name.to_string())
            .or_default()
            .push(form);
    }

    /// Assignment semantics: append to the nearest existing binding of
    /// `name`, or create it in the outermost (module) frame when no frame
    /// binds it yet.
    pub fn stash(&mut self, name: &str, form: Node<'t>) {
        for frame in self.frames.iter_mut().rev() {
            if let Some(forms) = frame.bindings.get_mut(name) {
                forms.push(form);
                return;
            }
        }
        self.frames[0]
            .bindings
            .entry(name.to_string())
            .or_default()
            .push(form);
    }

    /// Array-mutation semantics: append `forms` to the nearest existing
    /// binding of `name`. Returns false when no frame binds `name`; unlike
    /// assignment, mutation of an unknown receiver is not tracked.
    pub fn append_existing(&mut self, name: &str, forms: &[Node<'t>]) -> bool {
        for frame in self.frames.iter_mut().rev() {
            if let Some(existing) = frame.bindings.get_mut(name) {
                existing.extend_from_slice(forms);
                return true;
            }
        }
        false
    }

    /// Looks `name` up from the innermost frame outward. Returns the index of
    /// the defining frame and a snapshot of its candidate forms; forms added
    /// to the binding during a descent do not retroactively join a snapshot
    /// already being walked.
    pub fn resolve(&self, name: &str) -> Option<(usize, Vec<Node<'t>>)> {
        for (index, frame) in self.frames.iter().enumerate().rev() {
            if let Some(forms) = frame.bindings.get(name) {
                return Some((index, forms.clone()));
            }
        }
        None
    }

    /// Detaches every frame above `depth` frames, returning them for
    /// [`ScopeStack::restore`]. Descending into a resolved definition happens
    /// with only the frames that were visible where it was defined.
    pub fn detach_above(&mut self, depth: usize) -> Vec<ScopeFrame<'t>> {
        self.frames.split_off(depth)
    }

    pub fn restore(&mut self, detached: Vec<ScopeFrame<'t>>) {
        self.frames.extend(detached);
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Default for ScopeStack<'_> {
    fn default() -> Self {
        Self::new()
    }
}
