//! Sphinx docstring body: inline spans to reStructuredText, block tags to
//! field lists and directives.

use super::wrap::{body_width, fill, hang, WordBuilder};
use crate::model::{DocBlock, InlineSpan, Style, Text};
use regex::Regex;
use std::sync::LazyLock;

/// A `_` ending a word reads as a reference in rST.
static RE_TRAILING_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\B_\b").unwrap());

static RE_JAVA_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$").unwrap()
});

const PARAM_MARKER: &str = ":param : ";
const RAISES_MARKER: &str = ":raises : ";
const RETURNS_MARKER: &str = ":returns: ";
const DIRECTIVE_INDENT: usize = 3;

/// Render the docstring body, without surrounding quotes or indentation.
/// Sections are separated by one blank line.
pub fn render_docstring(doc: &DocBlock, width: usize) -> String {
    let mut sections: Vec<Vec<String>> = Vec::new();

    sections.push(render_text(&doc.description, width));
    for note in &doc.notes {
        sections.push(directive(".. note:: ", note, width));
    }
    if let Some(deprecated) = &doc.deprecated {
        sections.push(directive(".. deprecated:: ", deprecated, width));
    }

    if !doc.params.is_empty() {
        let widest = doc.params.iter().map(|p| p.name.len()).max().unwrap_or(0);
        let indent = widest + PARAM_MARKER.len();
        let lines = doc
            .params
            .iter()
            .flat_map(|p| {
                let body = render_text(&p.text, body_width(width, indent));
                hang(&format!(":param {}: ", p.name), indent, &body)
            })
            .collect();
        sections.push(lines);
    }

    if let Some(returns) = &doc.returns {
        let indent = RETURNS_MARKER.len();
        let body = render_text(returns, body_width(width, indent));
        sections.push(hang(RETURNS_MARKER, indent, &body));
    }

    if !doc.throws.is_empty() {
        let widest = doc.throws.iter().map(|t| t.ty.len()).max().unwrap_or(0);
        let indent = widest + RAISES_MARKER.len();
        let lines = doc
            .throws
            .iter()
            .flat_map(|t| {
                let body = render_text(&t.text, body_width(width, indent));
                hang(&format!(":raises {}: ", t.ty), indent, &body)
            })
            .collect();
        sections.push(lines);
    }

    sections.push(see_also(&doc.see_also, width));

    sections
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn directive(marker: &str, text: &Text, width: usize) -> Vec<String> {
    let body = render_text(text, body_width(width, DIRECTIVE_INDENT));
    hang(marker, DIRECTIVE_INDENT, &body)
}

fn see_also(refs: &[Text], width: usize) -> Vec<String> {
    match refs {
        [] => Vec::new(),
        [single] => directive(".. seealso:: ", single, width),
        many => {
            let mut lines = vec![".. seealso::".to_string(), String::new()];
            let pad = " ".repeat(DIRECTIVE_INDENT);
            for r in many {
                // one reference per line
                for line in render_text(r, 0) {
                    lines.push(format!("{}{}", pad, line));
                }
            }
            lines
        }
    }
}

/// Rendered block of a section's text.
enum Block {
    Lines(Vec<String>),
    Literal(Vec<String>),
}

/// Render a span run to lines, wrapping prose at `width`.
pub fn render_text(text: &[InlineSpan], width: usize) -> Vec<String> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut para = WordBuilder::default();

    fn end_paragraph(para: &mut WordBuilder, blocks: &mut Vec<Block>, width: usize) {
        let words = std::mem::take(para);
        if !words.is_empty() {
            blocks.push(Block::Lines(fill(&words.finish(), width)));
        }
    }

    for span in text {
        match span {
            InlineSpan::Text(s) => para.push_text(&escape_underscores(s)),
            InlineSpan::PassThrough(s) => para.push_text(s),
            InlineSpan::Code(_)
            | InlineSpan::Link { .. }
            | InlineSpan::Hyperlink { .. }
            | InlineSpan::Styled { .. } => para.push_atom(&atom(span)),
            InlineSpan::LineBreak => para.line_break(),
            InlineSpan::ParagraphBreak => end_paragraph(&mut para, &mut blocks, width),
            InlineSpan::List(items) => {
                end_paragraph(&mut para, &mut blocks, width);
                blocks.push(Block::Lines(render_list(items, width)));
            }
            InlineSpan::Preformatted(lines) => {
                end_paragraph(&mut para, &mut blocks, width);
                blocks.push(Block::Literal(lines.clone()));
            }
            InlineSpan::Verbatim(lines) => {
                end_paragraph(&mut para, &mut blocks, width);
                blocks.push(Block::Lines(lines.clone()));
            }
        }
    }
    end_paragraph(&mut para, &mut blocks, width);

    let mut rendered: Vec<Vec<String>> = Vec::new();
    for block in blocks {
        match block {
            Block::Lines(lines) => rendered.push(lines),
            Block::Literal(lines) => {
                // `Example:` becomes `Example::`, otherwise a bare `::`
                let attached = match rendered.last_mut().and_then(|b| b.last_mut()) {
                    Some(last) if last.ends_with("::") => true,
                    Some(last) if last.ends_with(':') => {
                        last.push(':');
                        true
                    }
                    _ => false,
                };
                if !attached {
                    rendered.push(vec!["::".to_string()]);
                }
                rendered.push(
                    lines
                        .iter()
                        .map(|l| {
                            if l.is_empty() {
                                String::new()
                            } else {
                                format!("    {}", l)
                            }
                        })
                        .collect(),
                );
            }
        }
    }

    let mut out = Vec::new();
    for block in rendered.into_iter().filter(|b| !b.is_empty()) {
        if !out.is_empty() {
            out.push(String::new());
        }
        out.extend(block);
    }
    out
}

fn render_list(items: &[Text], width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for item in items {
        let body = render_text(item, body_width(width, 2));
        out.extend(hang("- ", 2, &body));
    }
    out
}

/// rST for a span that must stay on one line.
fn atom(span: &InlineSpan) -> String {
    match span {
        InlineSpan::Code(code) => literal(code),
        InlineSpan::Link { target, label } => link_role(target, label.as_deref()),
        InlineSpan::Hyperlink { url, label } => {
            let label = collapse(label);
            if label.is_empty() || label == *url {
                url.clone()
            } else {
                format!("`{} <{}>`__", label, url)
            }
        }
        InlineSpan::Styled { style, text } => {
            let text = collapse(text);
            if text.is_empty() {
                return String::new();
            }
            match style {
                Style::Strong => format!("**{}**", text),
                Style::Emphasis => format!("*{}*", text),
                Style::Subscript => format!(":sub:`{}`", text),
                Style::Superscript => format!(":sup:`{}`", text),
            }
        }
        _ => String::new(),
    }
}

fn literal(code: &str) -> String {
    let code = collapse(code);
    if code.is_empty() {
        String::new()
    } else if code.contains('`') {
        // inline literals cannot hold backticks; the role content can be escaped
        let escaped = code.replace('\\', "\\\\").replace('`', "\\`");
        format!(":code:`{}`", escaped)
    } else {
        format!("``{}``", code)
    }
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn escape_underscores(s: &str) -> String {
    RE_TRAILING_UNDERSCORE.replace_all(s, r"\_").into_owned()
}

/// Sphinx cross-reference for a Javadoc reference.
///
/// `#m(..)` and `C#m(..)` are methods, `#f` is an attribute, anything else is
/// a class; only the simple class name is kept. Targets that are not Java
/// names fall back to a literal.
pub fn link_role(target: &str, label: Option<&str>) -> String {
    let (role, path) = match target.split_once('#') {
        Some((class, member)) => {
            let (member, role) = match member.split_once('(') {
                Some((name, _)) => (name, "meth"),
                None => (member, "attr"),
            };
            let class = class.rsplit('.').next().unwrap_or(class);
            let path = if class.is_empty() {
                member.to_string()
            } else {
                format!("{}.{}", class, member)
            };
            (role, path)
        }
        None => ("class", target.rsplit('.').next().unwrap_or(target).to_string()),
    };

    if !RE_JAVA_NAME.is_match(&path) {
        return literal(label.unwrap_or(target));
    }
    match label.map(collapse) {
        Some(label) if !label.is_empty() => format!(":{}:`{} <.{}>`", role, label, path),
        _ => format!(":{}:`.{}`", role, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParamEntry, ThrowsEntry};

    fn text(s: &str) -> InlineSpan {
        InlineSpan::Text(s.to_string())
    }

    #[test]
    fn link_roles() {
        assert_eq!(link_role("#getX()", None), ":meth:`.getX`");
        assert_eq!(link_role("Foo#bar(int, int)", None), ":meth:`.Foo.bar`");
        assert_eq!(link_role("#count", None), ":attr:`.count`");
        assert_eq!(link_role("java.util.List", None), ":class:`.List`");
        assert_eq!(link_role("#run()", Some("runs it")), ":meth:`runs it <.run>`");
        assert_eq!(link_role("Foo<T>", None), "``Foo<T>``");
    }

    #[test]
    fn code_with_backticks_uses_role() {
        let spans = vec![InlineSpan::Code("a``b".into())];
        assert_eq!(render_text(&spans, 79), vec![r":code:`a\`\`b`"]);
        assert_eq!(literal(r"x\`"), r":code:`x\\\``");
    }

    #[test]
    fn underscores_only_escaped_at_word_end() {
        assert_eq!(escape_underscores("name_ and snake_case"), r"name\_ and snake_case");
        assert_eq!(escape_underscores("_private"), "_private");
    }

    #[test]
    fn paragraphs_and_code() {
        let spans = vec![
            text("Sets the "),
            InlineSpan::Code("speed".into()),
            text("."),
            InlineSpan::ParagraphBreak,
            text("Second."),
        ];
        assert_eq!(render_text(&spans, 79), vec!["Sets the ``speed``.", "", "Second."]);
    }

    #[test]
    fn list_block() {
        let spans = vec![
            text("Options:"),
            InlineSpan::List(vec![vec![text("one")], vec![text("two words")]]),
        ];
        assert_eq!(render_text(&spans, 79), vec!["Options:", "", "- one", "- two words"]);
    }

    #[test]
    fn preformatted_after_colon() {
        let spans = vec![
            text("Example:"),
            InlineSpan::Preformatted(vec!["f(x);".into(), "  g();".into()]),
        ];
        assert_eq!(
            render_text(&spans, 79),
            vec!["Example::", "", "    f(x);", "      g();"]
        );
    }

    #[test]
    fn preformatted_alone() {
        let spans = vec![InlineSpan::Preformatted(vec!["x = 1;".into()])];
        assert_eq!(render_text(&spans, 79), vec!["::", "", "    x = 1;"]);
    }

    #[test]
    fn styles() {
        let spans = vec![
            InlineSpan::Styled {
                style: Style::Strong,
                text: "bold".into(),
            },
            text(" H"),
            InlineSpan::Styled {
                style: Style::Subscript,
                text: "2".into(),
            },
            text("O"),
        ];
        assert_eq!(render_text(&spans, 79), vec!["**bold** H:sub:`2`O"]);
    }

    #[test]
    fn full_docstring_layout() {
        let doc = DocBlock {
            description: vec![text("Moves the robot.")],
            params: vec![
                ParamEntry {
                    name: "x".into(),
                    text: vec![text("the x")],
                },
                ParamEntry {
                    name: "speed".into(),
                    text: vec![text("how fast")],
                },
            ],
            returns: Some(vec![text("true on success")]),
            throws: vec![ThrowsEntry {
                ty: "IOException".into(),
                text: vec![text("on failure")],
            }],
            deprecated: Some(vec![text("use drive()")]),
            see_also: vec![vec![InlineSpan::Link {
                target: "#drive()".into(),
                label: None,
            }]],
            ..Default::default()
        };
        let expected = "\
Moves the robot.

.. deprecated:: use drive()

:param x:     the x
:param speed: how fast

:returns: true on success

:raises IOException: on failure

.. seealso:: :meth:`.drive`";
        assert_eq!(render_docstring(&doc, 79), expected);
    }

    #[test]
    fn param_continuation_is_aligned() {
        let doc = DocBlock {
            params: vec![ParamEntry {
                name: "n".into(),
                text: vec![text("aaaa bbbb cccc dddd eeee ffff gggg")],
            }],
            ..Default::default()
        };
        // indent 10, body width 20
        assert_eq!(
            render_docstring(&doc, 30),
            ":param n: aaaa bbbb cccc dddd\n          eeee ffff gggg"
        );
    }

    #[test]
    fn several_see_also_entries() {
        let doc = DocBlock {
            see_also: vec![
                vec![InlineSpan::Link {
                    target: "Foo".into(),
                    label: None,
                }],
                vec![text("the manual")],
            ],
            ..Default::default()
        };
        assert_eq!(
            render_docstring(&doc, 79),
            ".. seealso::\n\n   :class:`.Foo`\n   the manual"
        );
    }

    #[test]
    fn empty_doc_renders_nothing() {
        assert_eq!(render_docstring(&DocBlock::default(), 79), "");
    }

    #[test]
    fn param_without_text() {
        let doc = DocBlock {
            params: vec![ParamEntry {
                name: "x".into(),
                text: Vec::new(),
            }],
            ..Default::default()
        };
        assert_eq!(render_docstring(&doc, 79), ":param x:");
    }
}
