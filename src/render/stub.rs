//! Default mode: a type-hinted Python method stub carrying the docstring.

use super::{indent_lines, sphinx, Renderer};
use crate::model::JavaSignature;
use crate::types::python_hint;
use crate::{Conversion, Options};

pub struct StubRenderer;

impl Renderer for StubRenderer {
    fn render(&self, conv: &Conversion, opts: &Options) -> String {
        let body = sphinx::render_docstring(&conv.doc, opts.width);
        let mut out = Vec::new();
        if let Some(sig) = &conv.signature {
            out.push(signature(sig));
            // a `def` needs a body even when the comment was empty
            out.push(format_docstring(&body, opts.indent));
        } else if !body.is_empty() {
            out.push(format_docstring(&body, opts.indent));
        }
        out.join("\n")
    }
}

/// `def` line (with `@classmethod` for static methods), indented as a
/// class member.
pub fn signature(sig: &JavaSignature) -> String {
    let name = if sig.is_constructor() {
        "__init__"
    } else {
        sig.name.as_str()
    };

    let receiver = if sig.is_static { "cls" } else { "self" };
    let mut params = vec![receiver.to_string()];
    for p in &sig.params {
        let star = if p.varargs { "*" } else { "" };
        params.push(format!("{}{}: {}", star, p.name, python_hint(&p.ty)));
    }

    let ret = sig
        .return_type
        .as_ref()
        .map_or_else(|| "None".to_string(), python_hint);

    let def = format!("    def {}({}) -> {}:", name, params.join(", "), ret);
    if sig.is_static {
        format!("    @classmethod\n{}", def)
    } else {
        def
    }
}

/// Quote `text` as a Python docstring indented by `indent` spaces.
pub fn format_docstring(text: &str, indent: usize) -> String {
    let mut text = text.replace(r#"""""#, r#"\"\"\""#);
    if text.ends_with('"') {
        text.pop();
        text.push_str("\\\"");
    }
    let prefix = if text.contains('\\') { "r" } else { "" };
    let pad = " ".repeat(indent);

    if !text.contains('\n') {
        return format!(r#"{}{}"""{}""""#, pad, prefix, text);
    }
    indent_lines(&format!("{}\"\"\"{}\n\"\"\"", prefix, text), &pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert;

    fn stub(input: &str) -> String {
        StubRenderer.render(&convert(input), &Options::default())
    }

    #[test]
    fn getter() {
        let out = stub("/**\n * Gets x.\n */\npublic int getX();");
        assert_eq!(out, "    def getX(self) -> int:\n        \"\"\"Gets x.\"\"\"");
    }

    #[test]
    fn static_method_with_params() {
        let out = stub(
            "/**\n * Adds.\n *\n * @param names the names\n * @param n count\n */\npublic static void add(List<String> names, final int n) {",
        );
        let expected = "    @classmethod
    def add(cls, names: List[str], n: int) -> None:
        \"\"\"Adds.

        :param names: the names
        :param n:     count
        \"\"\"";
        assert_eq!(out, expected);
    }

    #[test]
    fn constructor() {
        let out = stub("/** Creates one. */\npublic Pose(double x, double... rest)");
        assert_eq!(
            out,
            "    def __init__(self, x: float, *rest: float) -> None:\n        \"\"\"Creates one.\"\"\""
        );
    }

    #[test]
    fn no_prototype_is_docstring_only() {
        assert_eq!(stub("/** Just text. */"), "        \"\"\"Just text.\"\"\"");
    }

    #[test]
    fn empty_comment_still_gives_a_body() {
        let out = stub("/** */\npublic int getX();");
        assert_eq!(out, "    def getX(self) -> int:\n        \"\"\"\"\"\"");
    }

    #[test]
    fn method_with_body() {
        let out = stub(
            "/** Adds. */\npublic int add(int a, int b) {\n    return a + b; // sum\n}\n",
        );
        assert_eq!(
            out,
            "    def add(self, a: int, b: int) -> int:\n        \"\"\"Adds.\"\"\""
        );
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(stub(""), "");
    }

    #[test]
    fn backslash_needs_raw_prefix() {
        assert_eq!(format_docstring(r"a\_", 4), r#"    r"""a\_""""#);
    }

    #[test]
    fn embedded_quotes_escaped() {
        assert_eq!(
            format_docstring(r#"say """hi""" now"#, 0),
            r#"r"""say \"\"\"hi\"\"\" now""""#
        );
        assert_eq!(format_docstring(r#"ends "q""#, 0), r#"r"""ends "q\"""""#);
    }
}
