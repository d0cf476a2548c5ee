//! C string mode: one string literal per line, for pasting into C++ sources.

use super::{sphinx, Renderer};
use crate::{Conversion, Options};

pub struct CStringRenderer;

impl Renderer for CStringRenderer {
    fn render(&self, conv: &Conversion, opts: &Options) -> String {
        let body = sphinx::render_docstring(&conv.doc, opts.width);
        if body.is_empty() {
            return String::new();
        }
        let escaped = body.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escaped.replace('\n', "\\n\"\n\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_become_literals() {
        let conv = crate::convert("/**\n * Say \"hi\".\n *\n * @param name_ who\n */");
        let out = CStringRenderer.render(&conv, &Options::default());
        assert_eq!(
            out,
            "\"Say \\\"hi\\\".\\n\"\n\"\\n\"\n\":param name_: who\""
        );
    }
}
