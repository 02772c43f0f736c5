//! Markdown report posted on the pull request.

use crate::fixer::FixResult;

/// Render the report for `fixes`, in arrival order.
pub fn render_report_md(fixes: &[FixResult], auto_commit: bool) -> String {
    let verdict = if auto_commit {
        "had their final line ending fixed"
    } else {
        "are missing a line break at their end"
    };

    let mut out = format!("{} file(s) {}:\n\n", fixes.len(), verdict);
    for fix in fixes {
        out.push_str(&format!("- {}\n", code_span(&fix.path)));
    }
    out
}

/// Inline code span for `text`, fenced with one more backtick than its
/// longest backtick run.
fn code_span(text: &str) -> String {
    let longest = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    if longest == 0 {
        return format!("`{text}`");
    }
    let fence = "`".repeat(longest + 1);
    format!("{fence} {text} {fence}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixer::Terminator;

    fn fix(path: &str) -> FixResult {
        FixResult {
            path: path.to_string(),
            content: String::new(),
            terminator: Terminator::Lf,
        }
    }

    #[test]
    fn auto_commit_report_render_is_stable() {
        let actual = render_report_md(&[fix("src/a.rs"), fix("README.md")], true);
        let expected =
            "2 file(s) had their final line ending fixed:\n\n- `src/a.rs`\n- `README.md`\n";
        assert_eq!(actual, expected);
    }

    #[test]
    fn report_only_wording() {
        let actual = render_report_md(&[fix("a.txt")], false);
        assert_eq!(
            actual,
            "1 file(s) are missing a line break at their end:\n\n- `a.txt`\n"
        );
    }

    #[test]
    fn backticks_in_paths_stay_inside_the_code_span() {
        let actual = render_report_md(&[fix("docs/a`b.md"), fix("x``y")], true);
        assert_eq!(
            actual,
            "2 file(s) had their final line ending fixed:\n\n- `` docs/a`b.md ``\n- ``` x``y ```\n"
        );
    }

    #[test]
    fn empty_report_has_no_bullets() {
        let actual = render_report_md(&[], true);
        assert_eq!(actual, "0 file(s) had their final line ending fixed:\n\n");
    }
}
