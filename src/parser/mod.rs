//! Parsers for the two input halves: the documentation comment and the
//! Java prototype that may follow it.

pub mod inline;
pub mod java;
pub mod normalize;
pub mod segment;

use crate::model::{DocBlock, ParamEntry, ThrowsEntry};

/// Parse one documentation comment: normalize, segment, then translate the
/// inline markup of every section.
pub fn parse_comment(comment: &str) -> DocBlock {
    let lines = normalize::normalize(comment);
    let raw = segment::segment(&lines);
    tracing::debug!(
        params = raw.params.len(),
        throws = raw.throws.len(),
        see = raw.see_also.len(),
        "segmented comment"
    );

    DocBlock {
        description: inline::translate(&raw.description),
        notes: raw.notes.iter().map(|n| inline::translate(n)).collect(),
        params: raw
            .params
            .iter()
            .map(|p| ParamEntry {
                name: p.name.clone(),
                text: inline::translate(&p.text),
            })
            .collect(),
        returns: raw.returns.as_deref().map(inline::translate),
        throws: raw
            .throws
            .iter()
            .map(|t| ThrowsEntry {
                ty: t.ty.clone(),
                text: inline::translate(&t.text),
            })
            .collect(),
        deprecated: raw.deprecated.as_deref().map(inline::translate),
        see_also: raw
            .see_also
            .iter()
            .map(|s| inline::translate_reference(s))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InlineSpan;

    #[test]
    fn full_comment() {
        let doc = parse_comment(
            "/**\n * Sets the {@code speed}.\n *\n * @param speed the speed\n * @return the old speed\n * @throws IllegalArgumentException if negative\n */",
        );
        assert_eq!(
            doc.description,
            vec![
                InlineSpan::Text("Sets the ".into()),
                InlineSpan::Code("speed".into()),
                InlineSpan::Text(".".into()),
            ]
        );
        assert_eq!(doc.params[0].name, "speed");
        assert_eq!(doc.params[0].text, vec![InlineSpan::Text("the speed".into())]);
        assert!(doc.returns.is_some());
        assert_eq!(doc.throws[0].ty, "IllegalArgumentException");
    }

    #[test]
    fn empty_comment() {
        assert!(parse_comment("").is_empty());
    }
}
