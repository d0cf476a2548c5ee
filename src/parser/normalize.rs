//! Comment normalizer: strips comment syntax, keeps the text.
//!
//! Handles `/** ... */` block comments (with or without the leading `*`
//! gutter), Doxygen `///`, `//!` and `//!<` line comments, and text that has
//! already been stripped, which passes through untouched.

use regex::Regex;
use std::sync::LazyLock;

static RE_DIFF_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\+").unwrap());

const LINE_COMMENT_PREFIXES: &[&str] = &["//!<", "///<", "///", "//!"];

/// How the comment block is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentStyle {
    /// `/** ... */`, or a bare `*` gutter
    Block,
    /// `///` or `//!` on every line
    Line,
    /// No recognisable comment syntax
    Plain,
}

/// Remove unified-diff `+` markers from the start of each line.
pub fn strip_diff_markers(input: &str) -> String {
    RE_DIFF_MARKER.replace_all(input, "").into_owned()
}

/// Split the input into the comment section and an optional prototype
/// section that follows the comment.
pub fn split_prototype(input: &str) -> (String, Option<String>) {
    let lines: Vec<&str> = input.lines().collect();

    let comment_end = if let Some(i) = lines.iter().position(|l| l.contains("*/")) {
        Some(i + 1)
    } else {
        let first = lines.iter().position(|l| !l.trim().is_empty());
        match first {
            Some(start) if is_line_comment(lines[start]) => {
                let run = lines[start..]
                    .iter()
                    .take_while(|l| l.trim().is_empty() || is_line_comment(l))
                    .count();
                Some(start + run)
            }
            _ => None,
        }
    };

    let Some(end) = comment_end else {
        return (input.to_string(), None);
    };

    let comment = lines[..end].join("\n");
    let prototype = lines[end..]
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if prototype.is_empty() {
        (comment, None)
    } else {
        (comment, Some(prototype))
    }
}

/// Strip comment delimiters and the `*` gutter from each line.
///
/// Lines that held only a comment boundary are dropped; interior blank lines
/// are kept as paragraph breaks. Indentation past the gutter (one space after
/// the `*`) is preserved.
pub fn normalize(comment: &str) -> Vec<String> {
    let style = detect_style(comment);
    let mut out: Vec<String> = Vec::new();

    for line in comment.lines() {
        let normalized = match style {
            CommentStyle::Block => normalize_block_line(line),
            CommentStyle::Line => normalize_line_comment(line),
            CommentStyle::Plain => Some(line.trim_end().to_string()),
        };
        if let Some(text) = normalized {
            out.push(text);
        }
    }

    let start = out.iter().position(|l| !l.trim().is_empty());
    let end = out.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(s), Some(e)) => out[s..=e].to_vec(),
        _ => Vec::new(),
    }
}

fn is_line_comment(line: &str) -> bool {
    let t = line.trim_start();
    LINE_COMMENT_PREFIXES.iter().any(|p| t.starts_with(p))
}

fn detect_style(comment: &str) -> CommentStyle {
    let non_blank: Vec<&str> = comment
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if non_blank.is_empty() {
        return CommentStyle::Plain;
    }
    if non_blank
        .iter()
        .any(|l| l.starts_with("/*") || l.ends_with("*/"))
        || non_blank.iter().all(|l| l.starts_with('*'))
    {
        return CommentStyle::Block;
    }
    if non_blank.iter().all(|l| is_line_comment(l)) {
        return CommentStyle::Line;
    }
    CommentStyle::Plain
}

/// Returns `None` for lines that carried only a comment boundary.
fn normalize_block_line(line: &str) -> Option<String> {
    let mut s = line.trim_start();
    let mut boundary = false;

    if let Some(rest) = s.strip_prefix("/**").or_else(|| s.strip_prefix("/*!")) {
        s = rest;
        boundary = true;
    } else if let Some(rest) = s.strip_prefix("/*") {
        s = rest;
        boundary = true;
    }

    let trimmed_end = s.trim_end();
    if let Some(rest) = trimmed_end.strip_suffix("*/") {
        s = rest.trim_end_matches('*');
        boundary = true;
    }

    // decorative runs of stars: `/*****`, `*****/`
    if boundary && s.trim().chars().all(|c| c == '*') {
        return None;
    }

    if !boundary || s.trim_start().starts_with('*') {
        let t = s.trim_start();
        if let Some(rest) = t.strip_prefix("*<") {
            s = strip_one_space(rest);
        } else if let Some(rest) = t.strip_prefix('*') {
            s = strip_one_space(rest);
        }
    } else {
        s = s.trim_start();
    }

    Some(s.trim_end().to_string())
}

fn normalize_line_comment(line: &str) -> Option<String> {
    let t = line.trim_start();
    for prefix in LINE_COMMENT_PREFIXES {
        if let Some(rest) = t.strip_prefix(prefix) {
            return Some(strip_one_space(rest).trim_end().to_string());
        }
    }
    Some(t.trim_end().to_string())
}

fn strip_one_space(s: &str) -> &str {
    s.strip_prefix(' ')
        .or_else(|| s.strip_prefix('\t'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_block_comment() {
        let input = "  /**\n   * Returns the value.\n   *\n   * More text.\n   */";
        assert_eq!(
            normalize(input),
            vec!["Returns the value.", "", "More text."]
        );
    }

    #[test]
    fn single_line_block() {
        assert_eq!(normalize("/** Gets x. */"), vec!["Gets x."]);
    }

    #[test]
    fn keeps_indentation_past_gutter() {
        let input = "/**\n * <pre>\n *   indented()\n * </pre>\n */";
        assert_eq!(normalize(input), vec!["<pre>", "  indented()", "</pre>"]);
    }

    #[test]
    fn doxygen_line_comments() {
        let input = "/// Brief text.\n///\n/// Details.";
        assert_eq!(normalize(input), vec!["Brief text.", "", "Details."]);
    }

    #[test]
    fn trailing_member_comment() {
        assert_eq!(normalize("//!< The count"), vec!["The count"]);
    }

    #[test]
    fn plain_text_passes_through() {
        let input = "Already clean.\n\n**bold** line\n  :param x: y";
        assert_eq!(
            normalize(input),
            vec!["Already clean.", "", "**bold** line", "  :param x: y"]
        );
    }

    #[test]
    fn empty_input() {
        assert!(normalize("").is_empty());
        assert!(normalize("/**\n */").is_empty());
    }

    #[test]
    fn gutter_without_delimiters() {
        let input = "* First.\n* @param a the a";
        assert_eq!(normalize(input), vec!["First.", "@param a the a"]);
    }

    #[test]
    fn split_finds_prototype_after_block() {
        let input = "/**\n * Doc.\n */\npublic int getX();\n";
        let (comment, proto) = split_prototype(input);
        assert_eq!(comment, "/**\n * Doc.\n */");
        assert_eq!(proto.as_deref(), Some("public int getX();"));
    }

    #[test]
    fn split_joins_multiline_prototype() {
        let input = "/** Doc. */\n@Override\npublic void set(int a,\n    int b) {";
        let (_, proto) = split_prototype(input);
        assert_eq!(proto.as_deref(), Some("@Override public void set(int a, int b) {"));
    }

    #[test]
    fn split_after_line_comments() {
        let input = "/// Doc.\n/// More.\nvoid run();";
        let (comment, proto) = split_prototype(input);
        assert_eq!(comment, "/// Doc.\n/// More.");
        assert_eq!(proto.as_deref(), Some("void run();"));
    }

    #[test]
    fn split_without_comment_syntax() {
        let (comment, proto) = split_prototype("Just text.\n@param a b");
        assert_eq!(comment, "Just text.\n@param a b");
        assert!(proto.is_none());
    }

    #[test]
    fn diff_markers_removed() {
        assert_eq!(strip_diff_markers("+/**\n+ * x\n+ */"), "/**\n * x\n */");
    }
}
