//! Inline markup translator: HTML and Javadoc inline tags to typed spans.
//!
//! Two passes over one section's text:
//!
//! 1. **Lexer**: a hand-written scanner producing a [`Token`] stream. Block
//!    constructs (`<pre>`, `@code`, list markers, text that is already
//!    reStructuredText) are recognised at line starts; `{@tag ...}`, HTML tags
//!    and entities anywhere.
//! 2. **Builder**: folds tokens into [`InlineSpan`]s with an explicit frame
//!    stack. Closing tags close the nearest matching frame (and anything
//!    opened inside it); a closing tag with no open frame becomes
//!    [`InlineSpan::PassThrough`]; frames still open at the end of the text
//!    are closed there.

use crate::model::{InlineSpan, Style, Text};
use regex::Regex;
use std::sync::LazyLock;

static RE_HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<(/?)([A-Za-z][A-Za-z0-9]*)(\s[^<>]*)?/?>").unwrap());

static RE_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap());

static RE_PRE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</pre\s*>").unwrap());

static RE_CODE_BLOCK_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[@\\]code(\{[^}]*\})?([ \t]+|$|\n)").unwrap());

static RE_CODE_BLOCK_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[@\\]endcode\b[^\n]*").unwrap());

// field list entry, directive, or bare literal-block marker
static RE_RST_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(:[A-Za-z][\w .\-]*:([ \t]|$|\n)|\.\. |::[ \t]*($|\n))").unwrap()
});

static RE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^&(lt|gt|amp|quot|apos|nbsp|#39|#64|#123|#125);").unwrap());

static RE_ENTITY_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(lt|gt|amp|quot|apos|nbsp|#39|#64|#123|#125);").unwrap());

/// HTML element names treated as markup. Anything else in angle brackets
/// (`List<String>`) is prose.
const KNOWN_HTML: &[&str] = &[
    "a", "abbr", "b", "big", "blockquote", "br", "caption", "center", "cite", "code", "dd",
    "del", "dfn", "div", "dl", "dt", "em", "font", "h1", "h2", "h3", "h4", "h5", "h6", "hr",
    "i", "img", "ins", "kbd", "li", "ol", "p", "pre", "q", "s", "samp", "small", "span",
    "strike", "strong", "sub", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
    "tt", "u", "ul", "var",
];

const SPECIAL: &[char] = &['\n', '{', '<', '&'];

const LIST_MARKERS: &[&str] = &["- ", "\\li "];

// -- Tokens -------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    /// Single line break inside a paragraph
    Newline,
    /// One or more blank lines
    BlankLine,
    /// `{@name body}`; `raw` is the full construct
    InlineTag {
        name: &'a str,
        body: &'a str,
        raw: &'a str,
    },
    /// `{@` with no closing brace
    Unterminated(&'a str),
    Open {
        name: String,
        attrs: &'a str,
    },
    Close {
        name: String,
        raw: &'a str,
    },
    Entity(&'static str),
    ListMarker,
    /// Raw contents of `<pre>` or `@code`
    Pre(&'a str),
    /// A paragraph already written in reStructuredText
    Verbatim(&'a str),
}

// -- Lexer --------------------------------------------------------------------

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line_start: bool,
    para_start: bool,
    /// The previous paragraph ended with `::`
    literal_next: bool,
    /// The text seen so far in this paragraph ends with `::`
    colons: bool,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            src,
            pos: 0,
            line_start: true,
            para_start: true,
            literal_next: false,
            colons: false,
        }
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        let src = self.src;
        if self.pos >= src.len() {
            return None;
        }
        let rest = &src[self.pos..];
        let at_line = std::mem::take(&mut self.line_start);
        let at_para = std::mem::take(&mut self.para_start);

        if at_line {
            if let Some(tok) = self.block_construct(rest, at_para) {
                return Some(tok);
            }
        }

        let tok = match rest.as_bytes()[0] {
            b'\n' => self.newline(),
            b'{' => self.inline_tag(rest),
            b'<' => self.html_tag(rest),
            b'&' => self.entity(rest),
            _ => self.text(rest),
        };
        Some(tok)
    }

    /// Constructs that only exist at the start of a line.
    fn block_construct(&mut self, rest: &'a str, at_para: bool) -> Option<Token<'a>> {
        if at_para {
            let literal = std::mem::take(&mut self.literal_next);
            if literal && rest.starts_with([' ', '\t']) {
                return Some(self.verbatim(rest, true));
            }
            if RE_RST_BLOCK.is_match(rest) {
                return Some(self.verbatim(rest, false));
            }
        }

        let trimmed = rest.trim_start_matches([' ', '\t']);
        let lead = rest.len() - trimmed.len();

        if let Some(open) = RE_CODE_BLOCK_OPEN.find(trimmed) {
            self.colons = false;
            let body_start = lead + open.end();
            let body = &rest[body_start..];
            return Some(match RE_CODE_BLOCK_CLOSE.find(body) {
                Some(close) => {
                    self.pos += body_start + close.end();
                    Token::Pre(&body[..close.start()])
                }
                None => {
                    self.pos += rest.len();
                    Token::Pre(body)
                }
            });
        }

        for marker in LIST_MARKERS {
            if trimmed.starts_with(marker) {
                self.colons = false;
                self.pos += lead + marker.len();
                return Some(Token::ListMarker);
            }
        }
        None
    }

    /// Consume a paragraph that is kept exactly as written.
    ///
    /// With `indented_only` the block is the indented body of a literal
    /// block; otherwise it runs to the next blank line, plus any indented
    /// lines after blank lines (directive bodies).
    fn verbatim(&mut self, rest: &'a str, indented_only: bool) -> Token<'a> {
        let mut offset = 0;
        let mut end = 0;
        let mut prev_blank = false;

        for (i, line) in rest.split_inclusive('\n').enumerate() {
            let content = line.trim_end_matches(['\n', '\r']);
            let blank = content.trim().is_empty();
            let indented = content.starts_with([' ', '\t']);
            if i > 0 && !blank && !indented && (indented_only || prev_blank) {
                break;
            }
            if !blank {
                end = offset + content.len();
            }
            prev_blank = blank;
            offset += line.len();
        }

        let block = &rest[..end];
        self.pos += end;
        self.colons = block.trim_end().ends_with("::");
        Token::Verbatim(block)
    }

    fn newline(&mut self) -> Token<'a> {
        let src = self.src;
        let mut p = self.pos + 1;
        let mut blank = false;
        loop {
            let tail = &src[p..];
            match tail.find('\n') {
                Some(i) if tail[..i].trim().is_empty() => {
                    blank = true;
                    p += i + 1;
                }
                None if tail.trim().is_empty() => {
                    p = src.len();
                    break;
                }
                _ => break,
            }
        }
        self.pos = p;
        self.line_start = true;

        if blank {
            self.para_start = true;
            self.literal_next = std::mem::take(&mut self.colons);
            Token::BlankLine
        } else {
            Token::Newline
        }
    }

    fn inline_tag(&mut self, rest: &'a str) -> Token<'a> {
        let Some(after) = rest.strip_prefix("{@") else {
            return self.text(rest);
        };
        let name_len = after
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(after.len());
        if name_len == 0 {
            return self.text(rest);
        }

        let mut depth = 0usize;
        let mut close = None;
        for (i, c) in rest.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }

        // literal-content tags may hold unbalanced braces; they end at the
        // first `}`
        let name = &after[..name_len];
        if close.is_none() && matches!(name, "code" | "literal" | "value") {
            close = rest.find('}');
        }

        self.colons = false;
        match close {
            Some(end) => {
                self.pos += end + 1;
                Token::InlineTag {
                    name,
                    body: &rest[2 + name_len..end],
                    raw: &rest[..=end],
                }
            }
            None => {
                self.pos += 2;
                Token::Unterminated(&rest[..2])
            }
        }
    }

    fn html_tag(&mut self, rest: &'a str) -> Token<'a> {
        let Some(caps) = RE_HTML_TAG.captures(rest) else {
            return self.text(rest);
        };
        let name = caps[2].to_ascii_lowercase();
        if !KNOWN_HTML.contains(&name.as_str()) {
            return self.text(rest);
        }

        let len = caps[0].len();
        let closing = !caps[1].is_empty();
        self.pos += len;
        self.colons = false;

        if closing {
            return Token::Close {
                name,
                raw: &rest[..len],
            };
        }
        if name == "pre" {
            let body = &rest[len..];
            return match RE_PRE_CLOSE.find(body) {
                Some(m) => {
                    self.pos += m.end();
                    Token::Pre(&body[..m.start()])
                }
                None => {
                    self.pos += body.len();
                    Token::Pre(body)
                }
            };
        }
        Token::Open {
            name,
            attrs: caps.get(3).map_or("", |m| m.as_str()),
        }
    }

    fn entity(&mut self, rest: &'a str) -> Token<'a> {
        match RE_ENTITY.captures(rest) {
            Some(caps) => {
                self.pos += caps[0].len();
                self.colons = false;
                Token::Entity(entity_text(&caps[1]))
            }
            None => self.text(rest),
        }
    }

    /// Plain text up to the next special character; always at least one char.
    fn text(&mut self, rest: &'a str) -> Token<'a> {
        let end = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| SPECIAL.contains(c))
            .map_or(rest.len(), |(i, _)| i);
        let text = &rest[..end];
        self.pos += end;
        let trimmed = text.trim_end();
        if !trimmed.is_empty() {
            self.colons = trimmed.ends_with("::");
        }
        Token::Text(text)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        self.next_token()
    }
}

fn entity_text(name: &str) -> &'static str {
    match name {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "quot" => "\"",
        "apos" | "#39" => "'",
        "#64" => "@",
        "#123" => "{",
        "#125" => "}",
        _ => " ",
    }
}

/// Replace the supported HTML entities in `s`.
pub fn decode_entities(s: &str) -> String {
    RE_ENTITY_ANY
        .replace_all(s, |caps: &regex::Captures| entity_text(&caps[1]))
        .into_owned()
}

// -- Builder ------------------------------------------------------------------

#[derive(Debug)]
enum FrameKind {
    Style { tag: String, style: Style },
    Code { tag: String },
    Anchor { href: Option<String> },
    /// `tag` is `None` for lists opened by `- `, `\li` or a stray `<li>`
    List { tag: Option<String>, items: Vec<Text> },
    Item,
}

impl FrameKind {
    fn tag(&self) -> &str {
        match self {
            FrameKind::Style { tag, .. } | FrameKind::Code { tag } => tag,
            FrameKind::Anchor { .. } => "a",
            FrameKind::List { tag, .. } => tag.as_deref().unwrap_or(""),
            FrameKind::Item => "li",
        }
    }

    fn is_implicit_list(&self) -> bool {
        matches!(self, FrameKind::List { tag: None, .. })
    }
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    spans: Vec<InlineSpan>,
}

#[derive(Default)]
struct Builder {
    root: Vec<InlineSpan>,
    stack: Vec<Frame>,
}

impl Builder {
    fn spans(&mut self) -> &mut Vec<InlineSpan> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.spans,
            None => &mut self.root,
        }
    }

    fn push(&mut self, span: InlineSpan) {
        let spans = self.spans();
        match &span {
            InlineSpan::Text(s) => {
                if let Some(InlineSpan::Text(prev)) = spans.last_mut() {
                    prev.push_str(s);
                    return;
                }
            }
            InlineSpan::ParagraphBreak => {
                if matches!(spans.last(), None | Some(InlineSpan::ParagraphBreak)) {
                    return;
                }
            }
            _ => {}
        }
        spans.push(span);
    }

    fn open(&mut self, kind: FrameKind) {
        self.stack.push(Frame {
            kind,
            spans: Vec::new(),
        });
    }

    fn feed(&mut self, token: Token<'_>) {
        match token {
            Token::Text(s) => self.push(InlineSpan::Text(s.to_string())),
            Token::Newline => self.push(InlineSpan::Text("\n".to_string())),
            Token::BlankLine => {
                self.close_implicit_lists();
                self.push(InlineSpan::ParagraphBreak);
            }
            Token::InlineTag { name, body, raw } => self.inline_tag(name, body, raw),
            Token::Unterminated(s) => self.push(InlineSpan::PassThrough(s.to_string())),
            Token::Entity(s) => self.push(InlineSpan::Text(s.to_string())),
            Token::Open { name, attrs } => self.open_tag(&name, attrs),
            Token::Close { name, raw } => self.close_tag(&name, raw),
            Token::ListMarker => self.open_item(),
            Token::Pre(body) => {
                let lines = preformatted(body);
                if !lines.is_empty() {
                    self.push(InlineSpan::Preformatted(lines));
                }
            }
            Token::Verbatim(block) => {
                let lines = block.lines().map(|l| l.trim_end().to_string()).collect();
                self.push(InlineSpan::Verbatim(lines));
            }
        }
    }

    fn inline_tag(&mut self, name: &str, body: &str, raw: &str) {
        let body = body.trim();
        match name {
            "code" | "value" if !body.is_empty() => self.push(InlineSpan::Code(body.to_string())),
            "literal" => self.push(InlineSpan::Text(body.to_string())),
            "link" | "linkplain" if !body.is_empty() => {
                let (target, label) = split_link(body);
                self.push(InlineSpan::Link {
                    target: target.to_string(),
                    label: label.map(str::to_string),
                });
            }
            _ => self.push(InlineSpan::PassThrough(raw.to_string())),
        }
    }

    fn open_tag(&mut self, name: &str, attrs: &str) {
        match name {
            "p" => {
                self.close_implicit_lists();
                self.push(InlineSpan::ParagraphBreak);
            }
            "br" => self.push(InlineSpan::LineBreak),
            "b" | "strong" => self.open(FrameKind::Style {
                tag: name.to_string(),
                style: Style::Strong,
            }),
            "i" | "em" | "cite" | "var" | "dfn" => self.open(FrameKind::Style {
                tag: name.to_string(),
                style: Style::Emphasis,
            }),
            "sub" => self.open(FrameKind::Style {
                tag: name.to_string(),
                style: Style::Subscript,
            }),
            "sup" => self.open(FrameKind::Style {
                tag: name.to_string(),
                style: Style::Superscript,
            }),
            "code" | "tt" | "kbd" | "samp" => self.open(FrameKind::Code {
                tag: name.to_string(),
            }),
            "a" => {
                let href = RE_HREF.captures(attrs).and_then(|caps| {
                    caps.get(1)
                        .or_else(|| caps.get(2))
                        .or_else(|| caps.get(3))
                        .map(|m| m.as_str().to_string())
                });
                self.open(FrameKind::Anchor { href });
            }
            "ul" | "ol" => self.open(FrameKind::List {
                tag: Some(name.to_string()),
                items: Vec::new(),
            }),
            "li" => self.open_item(),
            // no counterpart in the target dialect: drop the tag, keep content
            _ => {}
        }
    }

    fn close_tag(&mut self, name: &str, raw: &str) {
        match name {
            "b" | "strong" | "i" | "em" | "cite" | "var" | "dfn" | "sub" | "sup" | "code"
            | "tt" | "kbd" | "samp" | "a" | "ul" | "ol" | "li" | "pre" => {
                if !self.close_named(name) {
                    self.push(InlineSpan::PassThrough(raw.to_string()));
                }
            }
            _ => {}
        }
    }

    /// Close the innermost frame opened by `name`, and every frame above it.
    fn close_named(&mut self, name: &str) -> bool {
        let Some(index) = self.stack.iter().rposition(|f| f.kind.tag() == name) else {
            return false;
        };
        while self.stack.len() > index {
            self.close_top();
        }
        true
    }

    fn open_item(&mut self) {
        if matches!(self.stack.last(), Some(Frame { kind: FrameKind::Item, .. })) {
            self.close_top();
        }
        if !matches!(self.stack.last(), Some(Frame { kind: FrameKind::List { .. }, .. })) {
            self.open(FrameKind::List {
                tag: None,
                items: Vec::new(),
            });
        }
        self.open(FrameKind::Item);
    }

    fn close_implicit_lists(&mut self) {
        loop {
            let n = self.stack.len();
            let close = match self.stack.last() {
                Some(frame) if frame.kind.is_implicit_list() => true,
                Some(Frame {
                    kind: FrameKind::Item,
                    ..
                }) => n >= 2 && self.stack[n - 2].kind.is_implicit_list(),
                _ => false,
            };
            if !close {
                break;
            }
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame.kind {
            FrameKind::Style { style, .. } => {
                let text = flatten(&frame.spans);
                if !text.is_empty() {
                    self.push(InlineSpan::Styled { style, text });
                }
            }
            FrameKind::Code { .. } => {
                let text = flatten(&frame.spans);
                if !text.is_empty() {
                    self.push(InlineSpan::Code(text));
                }
            }
            FrameKind::Anchor { href: Some(url) } => {
                let label = flatten(&frame.spans);
                let label = if label.is_empty() { url.clone() } else { label };
                self.push(InlineSpan::Hyperlink { url, label });
            }
            FrameKind::Anchor { href: None } => {
                for span in frame.spans {
                    self.push(span);
                }
            }
            FrameKind::List { items, .. } => {
                for span in frame.spans {
                    if !is_blank(&span) {
                        self.push(span);
                    }
                }
                if !items.is_empty() {
                    self.push(InlineSpan::List(items));
                }
            }
            FrameKind::Item => {
                let item = trim_spans(frame.spans);
                match self.stack.last_mut() {
                    Some(Frame {
                        kind: FrameKind::List { items, .. },
                        ..
                    }) => items.push(item),
                    _ => {
                        for span in item {
                            self.push(span);
                        }
                    }
                }
            }
        }
    }

    fn finish(mut self) -> Text {
        while !self.stack.is_empty() {
            self.close_top();
        }
        trim_spans(self.root)
    }
}

/// Split `{@link}` contents into target and optional label. Whitespace
/// inside a method's parameter list belongs to the target.
pub fn split_link(body: &str) -> (&str, Option<&str>) {
    let body = body.trim();
    let mut depth = 0i32;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            c if c.is_whitespace() && depth <= 0 => {
                let label = body[i..].trim();
                return (&body[..i], (!label.is_empty()).then_some(label));
            }
            _ => {}
        }
    }
    (body, None)
}

/// Plain text of a span run, whitespace collapsed.
pub fn flatten(spans: &[InlineSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        let piece = match span {
            InlineSpan::Text(s) | InlineSpan::Code(s) | InlineSpan::PassThrough(s) => s.clone(),
            InlineSpan::Link { target, label } => label.clone().unwrap_or_else(|| target.clone()),
            InlineSpan::Hyperlink { label, .. } => label.clone(),
            InlineSpan::Styled { text, .. } => text.clone(),
            InlineSpan::List(items) => items
                .iter()
                .map(|item| flatten(item))
                .collect::<Vec<_>>()
                .join(" "),
            InlineSpan::ParagraphBreak | InlineSpan::LineBreak => " ".to_string(),
            InlineSpan::Preformatted(lines) | InlineSpan::Verbatim(lines) => lines.join(" "),
        };
        out.push_str(&piece);
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_blank(span: &InlineSpan) -> bool {
    match span {
        InlineSpan::Text(s) => s.trim().is_empty(),
        InlineSpan::ParagraphBreak | InlineSpan::LineBreak => true,
        _ => false,
    }
}

/// Drop breaks and whitespace-only text at both ends, and trim the
/// outermost text.
fn trim_spans(mut spans: Vec<InlineSpan>) -> Vec<InlineSpan> {
    while spans.last().is_some_and(is_blank) {
        spans.pop();
    }
    let start = spans.iter().position(|s| !is_blank(s)).unwrap_or(spans.len());
    spans.drain(..start);

    if let Some(InlineSpan::Text(first)) = spans.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(InlineSpan::Text(last)) = spans.last_mut() {
        *last = last.trim_end().to_string();
    }
    spans
}

/// Lines of a preformatted block: a wrapping `{@code ...}` unwrapped,
/// entities decoded, outer blank lines dropped, common indentation removed.
fn preformatted(body: &str) -> Vec<String> {
    let trimmed = body.trim();
    let body = trimmed
        .strip_prefix("{@code")
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(body);
    let decoded = decode_entities(body);

    let lines: Vec<&str> = decoded.lines().map(str::trim_end).collect();
    let start = lines.iter().position(|l| !l.is_empty());
    let end = lines.iter().rposition(|l| !l.is_empty());
    match (start, end) {
        (Some(s), Some(e)) => unindent(&lines[s..=e]),
        _ => Vec::new(),
    }
}

/// Remove the common leading indentation of the non-empty lines.
fn unindent(lines: &[&str]) -> Vec<String> {
    let min_indent = lines
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            if l.len() >= min_indent {
                l[min_indent..].to_string()
            } else {
                l.to_string()
            }
        })
        .collect()
}

// -- Public API ---------------------------------------------------------------

/// Translate one section's raw text into inline spans.
pub fn translate(text: &str) -> Text {
    let mut builder = Builder::default();
    for token in Lexer::new(text) {
        builder.feed(token);
    }
    builder.finish()
}

/// Translate an `@see` reference: `"text"`, `<a href>`, or a Java reference
/// with an optional label.
pub fn translate_reference(raw: &str) -> Text {
    let raw = raw.trim();
    if let Some(quoted) = raw.strip_prefix('"') {
        let text = quoted.strip_suffix('"').unwrap_or(quoted);
        return vec![InlineSpan::Text(text.to_string())];
    }
    if raw.starts_with('<') || raw.contains("{@") {
        return translate(raw);
    }
    let (target, label) = split_link(raw);
    vec![InlineSpan::Link {
        target: target.to_string(),
        label: label.map(str::to_string),
    }]
}
