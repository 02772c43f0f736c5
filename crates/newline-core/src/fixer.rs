//! Trailing line terminator detection and repair.
//!
//! The terminator appended to a file follows the convention already used in
//! it: the first `\n` found (ignoring the very first character) decides
//! between CRLF and LF, a file with only bare `\r` gets CR, and anything else
//! gets LF.

use std::path::Path;

use crate::error::{NewlineError, Result};

/// Line terminator style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    Lf,
    Cr,
    CrLf,
}

impl Terminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Terminator::Lf => "\n",
            Terminator::Cr => "\r",
            Terminator::CrLf => "\r\n",
        }
    }
}

impl std::fmt::Display for Terminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Terminator::Lf => "LF",
            Terminator::Cr => "CR",
            Terminator::CrLf => "CRLF",
        };
        f.write_str(s)
    }
}

/// A file that was missing its trailing terminator and has been fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixResult {
    /// Repo-relative path
    pub path: String,
    /// Content after the fix, as written to the working copy
    pub content: String,
    pub terminator: Terminator,
}

/// Whether `content` already ends with `\n` or `\r`.
pub fn ends_with_terminator(content: &str) -> bool {
    content.ends_with('\n') || content.ends_with('\r')
}

/// Infer the terminator style used by `content`.
///
/// The first character is never treated as a line boundary, so a `\n` at
/// index 0 is ignored. `\n` is ASCII and never occurs inside a multi-byte
/// UTF-8 sequence, so scanning bytes from index 1 is the same as scanning
/// characters from the second one.
pub fn infer_terminator(content: &str) -> Terminator {
    let bytes = content.as_bytes();
    let first_lf = bytes
        .iter()
        .skip(1)
        .position(|&b| b == b'\n')
        .map(|i| i + 1);

    match first_lf {
        Some(i) if bytes[i - 1] == b'\r' => Terminator::CrLf,
        Some(_) => Terminator::Lf,
        None if bytes.contains(&b'\r') => Terminator::Cr,
        None => Terminator::Lf,
    }
}

/// Append the inferred terminator if `content` lacks one.
///
/// Returns `None` when nothing needs fixing. Idempotent: fixing the output
/// again returns `None`.
pub fn fix_content(content: &str) -> Option<(String, Terminator)> {
    if ends_with_terminator(content) {
        return None;
    }
    let terminator = infer_terminator(content);
    let mut fixed = String::with_capacity(content.len() + 2);
    fixed.push_str(content);
    fixed.push_str(terminator.as_str());
    Some((fixed, terminator))
}

/// Fix an eligible file in the working copy.
///
/// `content` is the text already read by the path filter. When a fix is
/// needed the fixed content is written back to `root/path` before the
/// [`FixResult`] is returned.
pub async fn fix_file(root: &Path, path: &str, content: &str) -> Result<Option<FixResult>> {
    let Some((fixed, terminator)) = fix_content(content) else {
        return Ok(None);
    };
    let full = root.join(path);
    tokio::fs::write(&full, fixed.as_bytes())
        .await
        .map_err(|e| NewlineError::io(&full, e))?;
    Ok(Some(FixResult {
        path: path.to_string(),
        content: fixed,
        terminator,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn inference_examples() {
        assert_eq!(infer_terminator("a\r\nb"), Terminator::CrLf);
        assert_eq!(infer_terminator("a\nb"), Terminator::Lf);
        assert_eq!(infer_terminator("ab"), Terminator::Lf);
        assert_eq!(infer_terminator("a"), Terminator::Lf);
        assert_eq!(infer_terminator("a\rb"), Terminator::Cr);
        assert_eq!(infer_terminator(""), Terminator::Lf);
    }

    #[test]
    fn first_newline_decides_mixed_files() {
        assert_eq!(infer_terminator("a\nb\r\nc"), Terminator::Lf);
        assert_eq!(infer_terminator("a\r\nb\nc"), Terminator::CrLf);
        assert_eq!(infer_terminator("a\rb\nc"), Terminator::Lf);
    }

    #[test]
    fn leading_character_is_not_a_boundary() {
        // The newline at index 0 is skipped and nothing else is found.
        assert_eq!(infer_terminator("\nx"), Terminator::Lf);
        // `\r` at index 0 still counts for the CR fallback.
        assert_eq!(infer_terminator("\rx"), Terminator::Cr);
        // A newline at index 1 preceded by `\r` at index 0 is CRLF.
        assert_eq!(infer_terminator("\r\nx"), Terminator::CrLf);
    }

    #[test]
    fn multibyte_first_character() {
        assert_eq!(infer_terminator("é\r\nx"), Terminator::CrLf);
        assert_eq!(infer_terminator("日本"), Terminator::Lf);
    }

    #[test]
    fn terminated_content_is_left_alone() {
        assert_eq!(fix_content("done\n"), None);
        assert_eq!(fix_content("done\r\n"), None);
        assert_eq!(fix_content("done\r"), None);
        assert_eq!(fix_content("\r"), None);
    }

    #[test]
    fn fix_appends_exactly_one_terminator_and_is_idempotent() {
        let samples = ["a", "ab", "a\nb", "a\r\nb", "a\rb", "", "line1\r\nline2\r\nlast"];
        for sample in samples {
            let (fixed, terminator) = fix_content(sample).expect("needs fixing");
            assert_eq!(fixed, format!("{sample}{}", terminator.as_str()));
            assert!(ends_with_terminator(&fixed));
            assert_eq!(fix_content(&fixed), None, "second fix of {sample:?}");
        }
    }

    #[test]
    fn terminator_display_names() {
        assert_eq!(Terminator::Lf.to_string(), "LF");
        assert_eq!(Terminator::Cr.to_string(), "CR");
        assert_eq!(Terminator::CrLf.to_string(), "CRLF");
    }

    #[tokio::test]
    async fn fix_file_writes_working_copy() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("win.txt"), "one\r\ntwo").unwrap();

        let result = fix_file(dir.path(), "win.txt", "one\r\ntwo")
            .await
            .unwrap()
            .expect("fixed");
        assert_eq!(result.terminator, Terminator::CrLf);
        assert_eq!(result.content, "one\r\ntwo\r\n");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("win.txt")).unwrap(),
            "one\r\ntwo\r\n"
        );

        let again = fix_file(dir.path(), "win.txt", &result.content).await.unwrap();
        assert!(again.is_none());
    }
}
