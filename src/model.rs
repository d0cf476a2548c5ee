//! Data model for a converted comment, independent of the output dialect.

use std::fmt;

/// Translated prose of one section: an ordered run of inline spans.
pub type Text = Vec<InlineSpan>;

/// A parsed documentation comment.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DocBlock {
    /// Leading free-text prose
    pub description: Text,
    /// @note sections, in source order
    pub notes: Vec<Text>,
    /// @param entries, one per distinct name, in declaration order
    pub params: Vec<ParamEntry>,
    /// @return / @returns
    pub returns: Option<Text>,
    /// @throws / @exception entries (duplicates allowed)
    pub throws: Vec<ThrowsEntry>,
    /// @deprecated; presence implies deprecation
    pub deprecated: Option<Text>,
    /// @see references, one entry each
    pub see_also: Vec<Text>,
}

impl DocBlock {
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.notes.is_empty()
            && self.params.is_empty()
            && self.returns.is_none()
            && self.throws.is_empty()
            && self.deprecated.is_none()
            && self.see_also.is_empty()
    }

    pub fn param(&self, name: &str) -> Option<&ParamEntry> {
        self.params.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamEntry {
    pub name: String,
    pub text: Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowsEntry {
    /// Exception type as written, e.g. `IOException`
    pub ty: String,
    pub text: Text,
}

/// Inline markup after translation out of HTML/Javadoc.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineSpan {
    /// Prose; whitespace is not significant.
    Text(String),
    /// `{@code X}`, `{@value X}`, `<code>X</code>`, `<tt>X</tt>`
    Code(String),
    /// `{@link target label}`; `target` is the raw Java reference
    Link { target: String, label: Option<String> },
    /// `<a href="url">label</a>`
    Hyperlink { url: String, label: String },
    /// Emphasis-like markup; nested markup is flattened into `text`
    Styled { style: Style, text: String },
    /// `<ul>`/`<ol>`/`\li`; each item is its own span run
    List(Vec<Text>),
    ParagraphBreak,
    LineBreak,
    /// `<pre>` or `@code ... @endcode`, common indentation removed
    Preformatted(Vec<String>),
    /// Lines already in reStructuredText form, emitted untouched
    Verbatim(Vec<String>),
    /// Markup that was not recognised, kept literally
    PassThrough(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Strong,
    Emphasis,
    Subscript,
    Superscript,
}

/// A parsed Java method prototype.
#[derive(Debug, Clone, PartialEq)]
pub struct JavaSignature {
    /// `None` for constructors
    pub return_type: Option<JavaType>,
    pub name: String,
    pub params: Vec<JavaParameter>,
    pub is_static: bool,
    pub throws: Vec<JavaType>,
}

impl JavaSignature {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaParameter {
    /// Element type for varargs parameters
    pub ty: JavaType,
    pub name: String,
    pub varargs: bool,
}

/// A Java type reference as it appears in a prototype.
#[derive(Debug, Clone, PartialEq)]
pub enum JavaType {
    /// `int`, `String`, `java.util.Map<K, V>`
    Named { name: String, args: Vec<JavaType> },
    /// `T[]`
    Array(Box<JavaType>),
    /// `?`, `? extends T`, `? super T`
    Wildcard { bound: Option<Box<JavaType>>, upper: bool },
    /// Tokens that did not form a type, kept as written
    Literal(String),
}

impl JavaType {
    pub fn named(name: &str) -> Self {
        JavaType::Named {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    /// Last segment of a qualified name: `java.util.List` → `List`.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            JavaType::Named { name, .. } => Some(name.rsplit('.').next().unwrap_or(name)),
            _ => None,
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            JavaType::Array(inner) => write!(f, "{}[]", inner),
            JavaType::Wildcard { bound: None, .. } => f.write_str("?"),
            JavaType::Wildcard {
                bound: Some(b),
                upper,
            } => write!(f, "? {} {}", if *upper { "extends" } else { "super" }, b),
            JavaType::Literal(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_generic() {
        let ty = JavaType::Named {
            name: "Map".into(),
            args: vec![
                JavaType::named("String"),
                JavaType::Array(Box::new(JavaType::named("int"))),
            ],
        };
        assert_eq!(ty.to_string(), "Map<String, int[]>");
    }

    #[test]
    fn display_wildcard() {
        let ty = JavaType::Wildcard {
            bound: Some(Box::new(JavaType::named("Number"))),
            upper: true,
        };
        assert_eq!(ty.to_string(), "? extends Number");
    }

    #[test]
    fn simple_name_strips_package() {
        assert_eq!(JavaType::named("java.util.List").simple_name(), Some("List"));
    }
}
