//! File rewriting for applying fixes.
//!
//! Splices a replacement import declaration over the byte range captured
//! during analysis. Only one range per file is ever rewritten, so there is
//! no offset bookkeeping beyond a bounds check.

use anyhow::{Result, bail};
use std::ops::Range;
use std::path::Path;

/// Replaces `range` in `content` with `replacement`, returning the new text.
///
/// The range must fall on character boundaries within the content it was
/// captured from; a stale or out-of-bounds range is an error rather than a
/// silent partial write.
pub fn splice(content: &str, range: Range<usize>, replacement: &str) -> Result<String> {
    if range.start > range.end
        || range.end > content.len()
        || !content.is_char_boundary(range.start)
        || !content.is_char_boundary(range.end)
    {
        bail!(
            "replacement range {}..{} does not fit content of {} bytes",
            range.start,
            range.end,
            content.len()
        );
    }
    let mut result = String::with_capacity(content.len() + replacement.len());
    result.push_str(&content[..range.start]);
    result.push_str(replacement);
    result.push_str(&content[range.end..]);
    Ok(result)
}

/// Splices `replacement` over `range` in `file` and writes the result back.
pub fn apply_fix(file: &Path, range: Range<usize>, replacement: &str) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let new_content = splice(&content, range, replacement)?;
    std::fs::write(file, new_content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn replaces_exact_span() {
        let content = "const {DIV} = choc; //autoimport\nlet x = 1;\n";
        let result = splice(content, 0..19, "const {B, DIV} = choc;").unwrap();
        assert_eq!(result, "const {B, DIV} = choc; //autoimport\nlet x = 1;\n");
    }

    #[test]
    fn leaves_matching_text_elsewhere_alone() {
        let content = "// const {DIV} = choc;\nconst {DIV} = choc; //autoimport\n";
        let result = splice(content, 23..42, "const {P} = choc;").unwrap();
        assert_eq!(
            result,
            "// const {DIV} = choc;\nconst {P} = choc; //autoimport\n"
        );
    }

    #[test]
    fn handles_shrinking_and_growing_replacements() {
        let content = "abcdef";
        assert_eq!(splice(content, 2..4, "").unwrap(), "abef");
        assert_eq!(splice(content, 2..4, "XYZW").unwrap(), "abXYZWef");
    }

    #[test]
    fn out_of_bounds_range_is_an_error() {
        assert!(splice("short", 0..99, "x").is_err());
        assert!(splice("short", 4..2, "x").is_err());
    }

    #[test]
    fn non_boundary_range_is_an_error() {
        assert!(splice("héllo", 0..2, "x").is_err());
    }

    #[test]
    fn writes_the_fix_back_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.js");
        fs::write(&path, "const {DIV} = choc; //autoimport\n").unwrap();
        apply_fix(&path, 0..19, "const {DIV, UL} = choc;").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "const {DIV, UL} = choc; //autoimport\n"
        );
    }
}
