//! Consistency checks between the `@param` fields and the prototype.
//!
//! The two are sourced independently, so disagreement is reported, never
//! corrected: both versions still reach the output.

use crate::model::{DocBlock, JavaSignature};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `@param` names a parameter the prototype does not have.
    UnknownParam { name: String },
    /// The prototype has a parameter with no `@param`.
    UndocumentedParam { name: String },
    /// Same names on both sides, different order.
    ParamOrder { documented: Vec<String>, declared: Vec<String> },
    /// A prototype was present but could not be read.
    UnparsablePrototype { reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownParam { name } => {
                write!(f, "@param {} does not match any prototype parameter", name)
            }
            Diagnostic::UndocumentedParam { name } => {
                write!(f, "parameter {} has no @param entry", name)
            }
            Diagnostic::ParamOrder {
                documented,
                declared,
            } => write!(
                f,
                "@param order ({}) differs from prototype order ({})",
                documented.join(", "),
                declared.join(", ")
            ),
            Diagnostic::UnparsablePrototype { reason } => {
                write!(f, "prototype ignored: {}", reason)
            }
        }
    }
}

/// Compare documented parameters with the declared ones.
///
/// A comment without any `@param` is not checked: undocumented parameters
/// are only reported once the author started documenting them.
pub fn check_params(doc: &DocBlock, sig: &JavaSignature) -> Vec<Diagnostic> {
    if doc.params.is_empty() {
        return Vec::new();
    }

    let declared: Vec<String> = sig.params.iter().map(|p| p.name.clone()).collect();
    let documented: Vec<String> = doc
        .params
        .iter()
        .map(|p| p.name.clone())
        // generic type parameters (`@param <T>`) are not method parameters
        .filter(|n| !is_type_variable(n, sig))
        .collect();

    let mut out = Vec::new();
    for name in &documented {
        if !declared.contains(name) {
            out.push(Diagnostic::UnknownParam { name: name.clone() });
        }
    }
    for name in &declared {
        if !documented.contains(name) {
            out.push(Diagnostic::UndocumentedParam { name: name.clone() });
        }
    }
    if out.is_empty() && documented != declared {
        out.push(Diagnostic::ParamOrder {
            documented,
            declared,
        });
    }
    out
}

/// Single upper-case letters that no parameter is called.
fn is_type_variable(name: &str, sig: &JavaSignature) -> bool {
    let mut chars = name.chars();
    let single_upper =
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase());
    single_upper && !sig.params.iter().any(|p| p.name == name)
}
