//! YAML mode: the docstring body as the block scalar of a `doc:` key.

use super::{indent_lines, sphinx, Renderer};
use crate::{Conversion, Options};

pub struct YamlRenderer;

impl Renderer for YamlRenderer {
    fn render(&self, conv: &Conversion, opts: &Options) -> String {
        let body = sphinx::render_docstring(&conv.doc, opts.width);
        if body.is_empty() {
            return String::new();
        }
        format!("  doc: |\n{}", indent_lines(&body, "    "))
    }
}
