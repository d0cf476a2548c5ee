//! sphinxify: convert Javadoc/Doxygen comments into Sphinx docstrings.
//!
//! The input is one comment block, optionally followed by the Java prototype
//! it documents. [`convert`] parses both halves independently; a
//! [`render::Renderer`] turns the result into one of the output modes.

pub mod diagnostics;
pub mod model;
pub mod parser;
pub mod render;
pub mod types;

use diagnostics::Diagnostic;
use model::{DocBlock, JavaSignature};

/// Layout knobs shared by all renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Wrap column for docstring text; `0` disables wrapping.
    pub width: usize,
    /// Indentation of the docstring body in method stubs.
    pub indent: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            width: 79,
            indent: 8,
        }
    }
}

/// Result of one conversion pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Conversion {
    pub doc: DocBlock,
    pub signature: Option<JavaSignature>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse an input (comment plus optional prototype).
pub fn convert(input: &str) -> Conversion {
    let input = parser::normalize::strip_diff_markers(input);
    let (comment, prototype) = parser::normalize::split_prototype(&input);

    let doc = parser::parse_comment(&comment);
    let mut diagnostics = Vec::new();

    let signature = match prototype {
        Some(src) => match parser::java::parse(&src) {
            Ok(sig) => Some(sig),
            Err(e) => {
                tracing::debug!(prototype = %src, error = %e, "prototype not parsed");
                diagnostics.push(Diagnostic::UnparsablePrototype {
                    reason: e.to_string(),
                });
                None
            }
        },
        None => None,
    };

    if let Some(sig) = &signature {
        diagnostics.extend(diagnostics::check_params(&doc, sig));
    }

    Conversion {
        doc,
        signature,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        let conv = convert("");
        assert!(conv.doc.is_empty());
        assert!(conv.signature.is_none());
        assert!(conv.diagnostics.is_empty());
    }

    #[test]
    fn comment_with_prototype() {
        let conv = convert("/**\n * Gets x.\n * @return x\n */\npublic int getX();\n");
        let sig = conv.signature.expect("signature");
        assert_eq!(sig.name, "getX");
        assert!(sig.params.is_empty());
        assert!(conv.doc.returns.is_some());
    }

    #[test]
    fn pasted_method_body_is_ignored() {
        let conv = convert("/** Adds. */\npublic int add(int a, int b) {\n    return a + b;\n}\n");
        assert!(conv.diagnostics.is_empty());
        let sig = conv.signature.expect("signature");
        assert_eq!(sig.name, "add");
        assert_eq!(sig.params.len(), 2);
    }

    #[test]
    fn bad_prototype_is_a_diagnostic() {
        let conv = convert("/** Doc. */\nvoid broken(int a");
        assert!(conv.signature.is_none());
        assert!(matches!(
            conv.diagnostics.as_slice(),
            [Diagnostic::UnparsablePrototype { .. }]
        ));
        assert!(!conv.doc.description.is_empty());
    }

    #[test]
    fn stale_param_is_reported() {
        let conv = convert("/**\n * @param old gone\n */\nvoid f(int fresh);");
        assert_eq!(conv.diagnostics.len(), 2);
        assert_eq!(conv.doc.params[0].name, "old");
    }
}
