//! Comment mode: the docstring body as `#:` attribute doc comments.

use super::{sphinx, Renderer};
use crate::{Conversion, Options};

const PREFIX: &str = "    #: ";

pub struct CommentRenderer;

impl Renderer for CommentRenderer {
    fn render(&self, conv: &Conversion, opts: &Options) -> String {
        let body = sphinx::render_docstring(&conv.doc, opts.width);
        if body.is_empty() {
            return String::new();
        }
        body.lines()
            .map(|l| format!("{}{}", PREFIX, l).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_line_prefixed() {
        let conv = crate::convert("/** First.\n *\n * Second. */");
        let out = CommentRenderer.render(&conv, &Options::default());
        assert_eq!(out, "    #: First.\n    #:\n    #: Second.");
    }
}
