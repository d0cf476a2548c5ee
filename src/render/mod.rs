//! Renderer module: trait-based output mode dispatch.

pub mod comment;
pub mod cstring;
pub mod raw;
pub mod sphinx;
pub mod stub;
pub mod wrap;
pub mod yaml;

use crate::{Conversion, Options};
use anyhow::{anyhow, Result};

/// Trait for rendering a conversion into one output mode.
pub trait Renderer {
    fn render(&self, conv: &Conversion, opts: &Options) -> String;
}

/// Create a renderer for the given mode name.
pub fn create_renderer(mode: &str) -> Result<Box<dyn Renderer>> {
    match mode {
        "default" | "stub" => Ok(Box::new(stub::StubRenderer)),
        "raw" => Ok(Box::new(raw::RawRenderer)),
        "yaml" => Ok(Box::new(yaml::YamlRenderer)),
        "cstring" => Ok(Box::new(cstring::CStringRenderer)),
        "comment" => Ok(Box::new(comment::CommentRenderer)),
        _ => Err(anyhow!(
            "unknown mode: {}. Use default, raw, yaml, cstring, or comment",
            mode
        )),
    }
}

/// Prefix every non-blank line of `text`.
pub(crate) fn indent_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, l)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_modes() {
        for mode in ["default", "raw", "yaml", "cstring", "comment"] {
            assert!(create_renderer(mode).is_ok(), "{}", mode);
        }
    }

    #[test]
    fn unknown_mode() {
        let err = create_renderer("server").err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("unknown mode: server. Use default, raw, yaml, cstring, or comment")
        );
    }

    #[test]
    fn indent_skips_blank_lines() {
        assert_eq!(indent_lines("a\n\nb", "  "), "  a\n\n  b");
    }
}
