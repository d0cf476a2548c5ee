//! Block segmenter: splits normalized lines into description and tagged
//! sections.
//!
//! A line opens a new section when its first token is `@tag` or `\tag` with a
//! known tag name. Everything else continues the open section. Unknown tags
//! stay in the text literally. Lines inside `<pre>` or `@code` regions never
//! open a section.

use regex::Regex;
use std::sync::LazyLock;

static RE_PRE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<pre(\s[^>]*)?>").unwrap());

static RE_PRE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</pre\s*>").unwrap());

static RE_CODE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[@\\]code(\{[^}]*\})?(\s|$)").unwrap());

static RE_CODE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[@\\]endcode\b").unwrap());

/// Section texts before inline translation; lines joined with `\n`.
#[derive(Debug, Default, PartialEq)]
pub struct RawDoc {
    pub description: String,
    pub notes: Vec<String>,
    pub params: Vec<RawParam>,
    pub returns: Option<String>,
    pub throws: Vec<RawThrows>,
    pub deprecated: Option<String>,
    pub see_also: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub struct RawParam {
    pub name: String,
    pub text: String,
}

#[derive(Debug, PartialEq)]
pub struct RawThrows {
    pub ty: String,
    pub text: String,
}

/// The section that continuation lines are appended to.
#[derive(Debug, Clone, Copy)]
enum Target {
    Description,
    Note(usize),
    Param(usize),
    Returns,
    Throws(usize),
    Deprecated,
    See(usize),
}

/// What a line-initial tag turned out to be.
enum Tag<'a> {
    Param { name: &'a str, text: &'a str },
    Returns(&'a str),
    Throws { ty: &'a str, text: &'a str },
    Deprecated(&'a str),
    See(&'a str),
    Note(&'a str),
    /// `@brief`: marker dropped, text continues the open section
    Brief(&'a str),
    /// `\fn`, `\class`: line dropped
    Skip,
    /// Not a section boundary; keep the line as written
    Literal,
}

/// Segment normalized comment lines into a [`RawDoc`].
pub fn segment(lines: &[String]) -> RawDoc {
    let mut doc = RawDoc::default();
    let mut target = Target::Description;
    let mut in_pre = false;
    let mut in_code = false;

    for line in lines {
        if in_pre || in_code {
            if in_pre && RE_PRE_CLOSE.is_match(line) {
                in_pre = false;
            }
            if in_code && RE_CODE_CLOSE.is_match(line) {
                in_code = false;
            }
            append(&mut doc, target, line);
            continue;
        }

        if let Some(open) = RE_PRE_OPEN.find(line) {
            in_pre = !RE_PRE_CLOSE.is_match(&line[open.end()..]);
        } else if RE_CODE_OPEN.is_match(line) {
            in_code = true;
        }

        match classify(line) {
            Tag::Param { name, text } => {
                let existing = doc.params.iter().position(|p| p.name == name);
                target = match existing {
                    Some(i) => {
                        append(&mut doc, Target::Param(i), text);
                        Target::Param(i)
                    }
                    None => {
                        doc.params.push(RawParam {
                            name: name.to_string(),
                            text: text.to_string(),
                        });
                        Target::Param(doc.params.len() - 1)
                    }
                };
            }
            Tag::Returns(text) => {
                target = Target::Returns;
                match doc.returns {
                    Some(_) => append(&mut doc, target, text),
                    None => doc.returns = Some(text.to_string()),
                }
            }
            Tag::Throws { ty, text } => {
                doc.throws.push(RawThrows {
                    ty: ty.to_string(),
                    text: text.to_string(),
                });
                target = Target::Throws(doc.throws.len() - 1);
            }
            Tag::Deprecated(text) => {
                target = Target::Deprecated;
                match doc.deprecated {
                    Some(_) => append(&mut doc, target, text),
                    None => doc.deprecated = Some(text.to_string()),
                }
            }
            Tag::See(text) => {
                doc.see_also.push(text.to_string());
                target = Target::See(doc.see_also.len() - 1);
            }
            Tag::Note(text) => {
                doc.notes.push(text.to_string());
                target = Target::Note(doc.notes.len() - 1);
            }
            Tag::Brief(text) => append(&mut doc, target, text),
            Tag::Skip => {}
            Tag::Literal => append(&mut doc, target, line),
        }
    }

    finish(doc)
}

/// Recognise a line-initial `@tag` / `\tag`.
fn classify(line: &str) -> Tag<'_> {
    let trimmed = line.trim_start();
    let Some(body) = trimmed
        .strip_prefix('@')
        .or_else(|| trimmed.strip_prefix('\\'))
    else {
        return Tag::Literal;
    };

    let name_len = body
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(body.len());
    let (name, rest) = body.split_at(name_len);
    // `@param:` or `@returns.` are not tags
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return Tag::Literal;
    }
    let rest = rest.trim_start();

    match name {
        "param" => match split_word(rest) {
            Some((word, text)) => Tag::Param {
                name: word.trim_start_matches('<').trim_end_matches('>'),
                text,
            },
            None => Tag::Literal,
        },
        "return" | "returns" | "result" => Tag::Returns(rest),
        "throws" | "throw" | "exception" => match split_word(rest) {
            Some((ty, text)) => Tag::Throws { ty, text },
            None => Tag::Literal,
        },
        "deprecated" => Tag::Deprecated(rest),
        "see" | "sa" if !rest.is_empty() => Tag::See(rest),
        "note" => Tag::Note(rest),
        "brief" | "short" => Tag::Brief(rest),
        "fn" | "class" if trimmed.starts_with('\\') => Tag::Skip,
        "enum" if trimmed.starts_with('\\') => match split_word(rest) {
            Some((_, text)) => Tag::Brief(text),
            None => Tag::Skip,
        },
        _ => Tag::Literal,
    }
}

/// Split off the first whitespace-delimited word.
fn split_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], s[i..].trim_start())),
        None => Some((s, "")),
    }
}

fn append(doc: &mut RawDoc, target: Target, line: &str) {
    let dest = match target {
        Target::Description => &mut doc.description,
        Target::Note(i) => &mut doc.notes[i],
        Target::Param(i) => &mut doc.params[i].text,
        Target::Returns => doc.returns.get_or_insert_with(String::new),
        Target::Throws(i) => &mut doc.throws[i].text,
        Target::Deprecated => doc.deprecated.get_or_insert_with(String::new),
        Target::See(i) => &mut doc.see_also[i],
    };
    dest.push('\n');
    dest.push_str(line);
}

/// Drop the blank lines collected at either end of each section.
fn finish(mut doc: RawDoc) -> RawDoc {
    fn trim(s: &mut String) {
        let kept: Vec<&str> = s.lines().skip_while(|l| l.trim().is_empty()).collect();
        *s = kept.join("\n").trim_end().to_string();
    }

    trim(&mut doc.description);
    doc.notes.iter_mut().for_each(trim);
    doc.params.iter_mut().for_each(|p| trim(&mut p.text));
    if let Some(r) = doc.returns.as_mut() {
        trim(r);
    }
    doc.throws.iter_mut().for_each(|t| trim(&mut t.text));
    if let Some(d) = doc.deprecated.as_mut() {
        trim(d);
    }
    doc.see_also.iter_mut().for_each(trim);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &str) -> Vec<String> {
        s.lines().map(str::to_string).collect()
    }

    #[test]
    fn description_only() {
        let doc = segment(&lines("First line.\nSecond line."));
        assert_eq!(doc.description, "First line.\nSecond line.");
        assert!(doc.params.is_empty());
    }

    #[test]
    fn params_in_order_with_continuations() {
        let doc = segment(&lines(
            "Desc.\n@param a the first\n   continued\n@param b the second\n@return the sum",
        ));
        assert_eq!(doc.description, "Desc.");
        assert_eq!(doc.params.len(), 2);
        assert_eq!(doc.params[0].name, "a");
        assert_eq!(doc.params[0].text, "the first\n   continued");
        assert_eq!(doc.params[1].name, "b");
        assert_eq!(doc.returns.as_deref(), Some("the sum"));
    }

    #[test]
    fn repeated_param_is_merged() {
        let doc = segment(&lines("@param x one\n@param y two\n@param x three"));
        assert_eq!(doc.params.len(), 2);
        assert_eq!(doc.params[0].text, "one\nthree");
    }

    #[test]
    fn unknown_tag_is_literal() {
        let doc = segment(&lines("Text.\n@since 1.2"));
        assert_eq!(doc.description, "Text.\n@since 1.2");
    }

    #[test]
    fn param_without_name_is_literal() {
        let doc = segment(&lines("@param"));
        assert!(doc.params.is_empty());
        assert_eq!(doc.description, "@param");
    }

    #[test]
    fn throws_and_synonyms() {
        let doc = segment(&lines(
            "@throws IOException on failure\n@exception IllegalStateException if closed\n@throws IOException again",
        ));
        assert_eq!(doc.throws.len(), 3);
        assert_eq!(doc.throws[1].ty, "IllegalStateException");
        assert_eq!(doc.throws[1].text, "if closed");
    }

    #[test]
    fn doxygen_backslash_tags() {
        let doc = segment(&lines(
            "\\brief Short.\n\\param n count\n\\returns value\n\\fn int f(int n)",
        ));
        assert_eq!(doc.description, "Short.");
        assert_eq!(doc.params[0].name, "n");
        assert_eq!(doc.returns.as_deref(), Some("value"));
    }

    #[test]
    fn deprecated_see_and_note() {
        let doc = segment(&lines(
            "Text.\n@note be careful\n@deprecated use {@link #other()}\n@see Foo\n@see #bar()",
        ));
        assert_eq!(doc.notes, vec!["be careful"]);
        assert_eq!(doc.deprecated.as_deref(), Some("use {@link #other()}"));
        assert_eq!(doc.see_also, vec!["Foo", "#bar()"]);
    }

    #[test]
    fn tags_inside_pre_do_not_split() {
        let doc = segment(&lines("Use:\n<pre>\n@param fake\n</pre>\n@param real yes"));
        assert_eq!(doc.description, "Use:\n<pre>\n@param fake\n</pre>");
        assert_eq!(doc.params.len(), 1);
        assert_eq!(doc.params[0].name, "real");
    }

    #[test]
    fn tags_inside_code_block_do_not_split() {
        let doc = segment(&lines("@code\n@return nothing\n@endcode\n@return real"));
        assert_eq!(doc.description, "@code\n@return nothing\n@endcode");
        assert_eq!(doc.returns.as_deref(), Some("real"));
    }

    #[test]
    fn blank_lines_stay_in_the_open_section() {
        let doc = segment(&lines("@return first\n\nsecond"));
        assert_eq!(doc.returns.as_deref(), Some("first\n\nsecond"));
    }

    #[test]
    fn generic_type_param_name() {
        let doc = segment(&lines("@param <T> element type"));
        assert_eq!(doc.params[0].name, "T");
    }
}
