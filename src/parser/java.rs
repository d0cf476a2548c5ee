//! Java method prototype parser.
//!
//! Tokenizes one prototype with a `logos` lexer and reads it with a small
//! recursive-descent parser:
//!
//! ```text
//! annotation* modifier* type-params? type? name '(' params ')' dims? throws? (';' | '{' ...)?
//! ```
//!
//! Generic arguments and array suffixes stay part of their type, so the
//! commas inside `Map<K, V>` never split parameters.

use crate::model::{JavaParameter, JavaSignature, JavaType};
use logos::Logos;
use std::ops::Range;
use thiserror::Error;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Tok {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?")]
    Question,
    #[token("&")]
    Amp,
    #[token("@")]
    At,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Eq,
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLit,
    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    Number,
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
}

/// Why a prototype could not be read. Never fatal: the pipeline treats any
/// of these as "no signature".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("empty prototype")]
    Empty,
    #[error("unrecognised character at offset {0}")]
    Lexical(usize),
    #[error("no parameter list")]
    MissingParameterList,
    #[error("no method name before the parameter list")]
    MissingName,
    #[error("unbalanced parentheses or brackets")]
    Unbalanced,
    #[error("malformed parameter `{0}`")]
    BadParameter(String),
}

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "synchronized",
    "abstract",
    "default",
    "native",
    "strictfp",
    "transient",
    "volatile",
];

#[derive(Debug, Clone)]
struct Lexeme<'a> {
    tok: Tok,
    text: &'a str,
    span: Range<usize>,
}

impl Lexeme<'_> {
    fn is_ident(&self, word: &str) -> bool {
        self.tok == Tok::Ident && self.text == word
    }
}

/// Tokens of the declaration header. Lexing stops after the first `{` or `;`
/// outside parentheses, so a pasted method body is never read.
fn lex(src: &str) -> Result<Vec<Lexeme<'_>>, SignatureError> {
    let mut lexer = Tok::lexer(src);
    let mut out = Vec::new();
    let mut depth = 0usize;
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let tok = result.map_err(|()| SignatureError::Lexical(span.start))?;
        out.push(Lexeme {
            tok,
            text: lexer.slice(),
            span,
        });
        match tok {
            Tok::LParen => depth += 1,
            Tok::RParen => depth = depth.saturating_sub(1),
            Tok::LBrace | Tok::Semicolon if depth == 0 => break,
            _ => {}
        }
    }
    Ok(out)
}

/// Parse a Java method or constructor prototype.
pub fn parse(src: &str) -> Result<JavaSignature, SignatureError> {
    let tokens = lex(src)?;
    if tokens.is_empty() {
        return Err(SignatureError::Empty);
    }

    let mut pos = 0;
    let mut is_static = false;

    // annotations, modifiers and method type parameters, in any order
    loop {
        match tokens.get(pos) {
            Some(t) if t.tok == Tok::At => pos = skip_annotation(&tokens, pos)?,
            Some(t) if t.tok == Tok::Ident && MODIFIERS.contains(&t.text) => {
                is_static |= t.text == "static";
                pos += 1;
            }
            Some(t) if t.tok == Tok::Lt => pos = skip_balanced(&tokens, pos, Tok::Lt, Tok::Gt)?,
            _ => break,
        }
    }

    let open = tokens[pos..]
        .iter()
        .position(|t| t.tok == Tok::LParen)
        .map(|i| pos + i)
        .ok_or(SignatureError::MissingParameterList)?;

    let head = &tokens[pos..open];
    let (name, ret) = match head.split_last() {
        Some((name, ret)) if name.tok == Tok::Ident => (name, ret),
        _ => return Err(SignatureError::MissingName),
    };

    let return_type = if ret.is_empty() {
        None
    } else {
        Some(parse_type(src, ret))
    };

    let close = skip_balanced(&tokens, open, Tok::LParen, Tok::RParen)? - 1;
    let params = split_top_level(&tokens[open + 1..close])
        .into_iter()
        .map(|param| parse_param(src, param))
        .collect::<Result<Vec<_>, _>>()?;

    // legacy `int f()[]` array return syntax
    let mut after = close + 1;
    let mut return_type = return_type;
    while tokens.get(after).map(|t| t.tok) == Some(Tok::LBracket)
        && tokens.get(after + 1).map(|t| t.tok) == Some(Tok::RBracket)
    {
        return_type = return_type.map(|t| JavaType::Array(Box::new(t)));
        after += 2;
    }

    let mut throws = Vec::new();
    if tokens.get(after).is_some_and(|t| t.is_ident("throws")) {
        let end = tokens[after + 1..]
            .iter()
            .position(|t| matches!(t.tok, Tok::LBrace | Tok::Semicolon))
            .map_or(tokens.len(), |i| after + 1 + i);
        throws = split_top_level(&tokens[after + 1..end])
            .into_iter()
            .filter(|group| !group.is_empty())
            .map(|group| parse_type(src, group))
            .collect();
    }

    Ok(JavaSignature {
        return_type,
        name: name.text.to_string(),
        params,
        is_static,
        throws,
    })
}

/// Skip `@Name` or `@Name(...)`; returns the index after it.
fn skip_annotation(tokens: &[Lexeme<'_>], at: usize) -> Result<usize, SignatureError> {
    let mut pos = at + 1;
    while tokens.get(pos).map(|t| t.tok) == Some(Tok::Ident) {
        pos += 1;
        if tokens.get(pos).map(|t| t.tok) == Some(Tok::Dot) {
            pos += 1;
        } else {
            break;
        }
    }
    if tokens.get(pos).map(|t| t.tok) == Some(Tok::LParen) {
        pos = skip_balanced(tokens, pos, Tok::LParen, Tok::RParen)?;
    }
    Ok(pos)
}

/// `tokens[at]` is `open`; returns the index after its matching `close`.
fn skip_balanced(
    tokens: &[Lexeme<'_>],
    at: usize,
    open: Tok,
    close: Tok,
) -> Result<usize, SignatureError> {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate().skip(at) {
        if t.tok == open {
            depth += 1;
        } else if t.tok == close {
            depth -= 1;
            if depth == 0 {
                return Ok(i + 1);
            }
        }
    }
    Err(SignatureError::Unbalanced)
}

/// Split on commas that are not nested inside `<...>` or `(...)`.
fn split_top_level<'t, 'a>(tokens: &'t [Lexeme<'a>]) -> Vec<&'t [Lexeme<'a>]> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut groups = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, t) in tokens.iter().enumerate() {
        match t.tok {
            Tok::Lt | Tok::LParen => depth += 1,
            Tok::Gt | Tok::RParen => depth -= 1,
            Tok::Comma if depth == 0 => {
                groups.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    groups.push(&tokens[start..]);
    groups
}

fn parse_param(src: &str, tokens: &[Lexeme<'_>]) -> Result<JavaParameter, SignatureError> {
    let mut pos = 0;
    loop {
        match tokens.get(pos) {
            Some(t) if t.tok == Tok::At => pos = skip_annotation(tokens, pos)?,
            Some(t) if t.is_ident("final") => pos += 1,
            _ => break,
        }
    }
    let rest = &tokens[pos..];
    let bad = || SignatureError::BadParameter(source_text(src, tokens).to_string());

    let (name, mut ty_tokens) = match rest.split_last() {
        Some((name, ty)) if name.tok == Tok::Ident && !ty.is_empty() => (name, ty),
        _ => return Err(bad()),
    };

    let varargs = ty_tokens.last().map(|t| t.tok) == Some(Tok::Ellipsis);
    if varargs {
        ty_tokens = &ty_tokens[..ty_tokens.len() - 1];
        if ty_tokens.is_empty() {
            return Err(bad());
        }
    }

    Ok(JavaParameter {
        ty: parse_type(src, ty_tokens),
        name: name.text.to_string(),
        varargs,
    })
}

/// The source text covered by `tokens`.
fn source_text<'a>(src: &'a str, tokens: &[Lexeme<'_>]) -> &'a str {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => &src[first.span.start..last.span.end],
        _ => "",
    }
}

/// Read a type from `tokens`; anything that is not a well-formed type is
/// kept as its literal source text.
fn parse_type(src: &str, tokens: &[Lexeme<'_>]) -> JavaType {
    let mut parser = TypeParser { tokens, pos: 0 };
    match parser.ty() {
        Some(ty) if parser.pos == tokens.len() => ty,
        _ => JavaType::Literal(source_text(src, tokens).to_string()),
    }
}

struct TypeParser<'t, 'a> {
    tokens: &'t [Lexeme<'a>],
    pos: usize,
}

impl TypeParser<'_, '_> {
    fn peek(&self) -> Option<Tok> {
        self.tokens.get(self.pos).map(|t| t.tok)
    }

    fn eat(&mut self, tok: Tok) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ty(&mut self) -> Option<JavaType> {
        let mut ty = if self.eat(Tok::Question) {
            self.wildcard()?
        } else {
            self.named()?
        };
        while self.peek() == Some(Tok::LBracket) {
            self.pos += 1;
            if !self.eat(Tok::RBracket) {
                return None;
            }
            ty = JavaType::Array(Box::new(ty));
        }
        Some(ty)
    }

    fn wildcard(&mut self) -> Option<JavaType> {
        let upper = match self.tokens.get(self.pos) {
            Some(t) if t.is_ident("extends") => true,
            Some(t) if t.is_ident("super") => false,
            _ => {
                return Some(JavaType::Wildcard {
                    bound: None,
                    upper: true,
                })
            }
        };
        self.pos += 1;
        let bound = self.named()?;
        Some(JavaType::Wildcard {
            bound: Some(Box::new(bound)),
            upper,
        })
    }

    fn named(&mut self) -> Option<JavaType> {
        let mut name = String::new();
        loop {
            // type-use annotations: `@NonNull String`
            while self.peek() == Some(Tok::At) {
                self.pos = skip_annotation(self.tokens, self.pos).ok()?;
            }
            let ident = self.tokens.get(self.pos).filter(|t| t.tok == Tok::Ident)?;
            name.push_str(ident.text);
            self.pos += 1;

            let mut args = Vec::new();
            if self.eat(Tok::Lt) {
                if !self.eat(Tok::Gt) {
                    loop {
                        args.push(self.ty()?);
                        if self.eat(Tok::Comma) {
                            continue;
                        }
                        if self.eat(Tok::Gt) {
                            break;
                        }
                        return None;
                    }
                }
            }

            if self.peek() == Some(Tok::Dot) {
                // generic outer types (`Outer<T>.Inner`) are not supported
                if !args.is_empty() {
                    return None;
                }
                self.pos += 1;
                name.push('.');
                continue;
            }
            return Some(JavaType::Named { name, args });
        }
    }
}
