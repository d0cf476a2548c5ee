//! Raw mode: the docstring body alone.

use super::{sphinx, Renderer};
use crate::{Conversion, Options};

pub struct RawRenderer;

impl Renderer for RawRenderer {
    fn render(&self, conv: &Conversion, opts: &Options) -> String {
        sphinx::render_docstring(&conv.doc, opts.width)
    }
}
