//! Define placeholder substitution for the shared template source.
//!
//! ## Notes
//! - The placeholder is matched **literally**. No regex or glob interpretation is applied.
//! - Everything outside the placeholder (line endings, trailing whitespace, encoding) is preserved byte for byte.

/// Replace every literal occurrence of `placeholder` in `original` with `replacement`.
///
/// ## Parameters
/// - `original`: template content as read from disk.
/// - `placeholder`: literal token to replace.
/// - `replacement`: per-test substitution value (usually a memory-image filename).
///
/// ## Returns
/// - (`String`): the rewritten content. Unchanged when `placeholder` does not occur, or is empty.
///
/// ## Examples
/// ```rust
/// use simrun_core::rewrite;
/// let src = "$readmemh(\"template.memfile\", RAM);\n";
/// assert_eq!(rewrite(src, "template.memfile", "add.mem"), "$readmemh(\"add.mem\", RAM);\n");
/// ```
pub fn rewrite(original: &str, placeholder: &str, replacement: &str) -> String {
    // `str::replace` with an empty pattern would interleave `replacement` between every char.
    if placeholder.is_empty() {
        return original.to_string();
    }
    original.replace(placeholder, replacement)
}

/// Byte-level [`rewrite`] for templates that are not valid UTF-8.
///
/// ## Notes
/// - Bytes outside the placeholder are copied unchanged, so Latin-1 comments and similar survive intact.
pub fn rewrite_bytes(original: &[u8], placeholder: &[u8], replacement: &[u8]) -> Vec<u8> {
    if placeholder.is_empty() {
        return original.to_vec();
    }
    let mut out = Vec::with_capacity(original.len());
    let mut rest = original;
    while let Some(pos) = find(rest, placeholder) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(replacement);
        rest = &rest[pos + placeholder.len()..];
    }
    out.extend_from_slice(rest);
    out
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_single_occurrence() {
        let src = "module tb;\n  initial $readmemh(\"template.memfile\", mem);\nendmodule\n";
        let out = rewrite(src, "template.memfile", "fib.mem");
        assert_eq!(out, "module tb;\n  initial $readmemh(\"fib.mem\", mem);\nendmodule\n");
    }

    #[test]
    fn test_rewrite_every_occurrence() {
        let out = rewrite("A template.memfile B template.memfile", "template.memfile", "x.mem");
        assert_eq!(out, "A x.mem B x.mem");
    }

    #[test]
    fn test_rewrite_missing_placeholder_is_identity() {
        let src = "no placeholder here\r\n  trailing  \n";
        assert_eq!(rewrite(src, "template.memfile", "x.mem"), src);
    }

    #[test]
    fn test_rewrite_is_literal_not_regex() {
        // `.` must not match an arbitrary character.
        let src = "templateXmemfile template.memfile";
        assert_eq!(rewrite(src, "template.memfile", "a.mem"), "templateXmemfile a.mem");
        assert_eq!(rewrite("a+b (a+b)", "(a+b)", "c"), "a+b c");
    }

    #[test]
    fn test_rewrite_preserves_crlf() {
        let src = "line1\r\ntemplate.memfile\r\n";
        assert_eq!(rewrite(src, "template.memfile", "t.mem"), "line1\r\nt.mem\r\n");
    }

    #[test]
    fn test_rewrite_bytes_keeps_non_utf8() {
        let src = b"// caf\xe9\n$readmemh(\"template.memfile\", mem);\n";
        let out = rewrite_bytes(src, b"template.memfile", b"fib.mem");
        assert_eq!(out, b"// caf\xe9\n$readmemh(\"fib.mem\", mem);\n".to_vec());
    }

    #[test]
    fn test_rewrite_bytes_matches_rewrite() {
        let src = "a template.memfile b template.memfile\r\n";
        let out = rewrite_bytes(src.as_bytes(), b"template.memfile", b"x.mem");
        assert_eq!(out, rewrite(src, "template.memfile", "x.mem").into_bytes());
        assert_eq!(rewrite_bytes(b"abc", b"", b"x"), b"abc".to_vec());
        assert_eq!(rewrite_bytes(b"templ", b"template.memfile", b"x"), b"templ".to_vec());
    }

    #[test]
    fn test_rewrite_empty_placeholder() {
        assert_eq!(rewrite("abc", "", "x"), "abc");
    }
}
