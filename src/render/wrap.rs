//! Greedy line filling over words that may contain unbreakable atoms.
//!
//! Prose is split at whitespace; markup atoms (literals, roles, links) are
//! glued to the surrounding characters and never split, even when they
//! contain spaces themselves.

/// One unit of a paragraph after word splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Word(String),
    /// Forced line break (`<br>`)
    Break,
}

/// Collects the words of one paragraph.
#[derive(Debug, Default)]
pub struct WordBuilder {
    pieces: Vec<Piece>,
    current: String,
}

impl WordBuilder {
    /// Append prose; whitespace separates words.
    pub fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                self.flush();
            } else {
                self.current.push(c);
            }
        }
    }

    /// Append an atom to the word being built.
    pub fn push_atom(&mut self, atom: &str) {
        self.current.push_str(atom);
    }

    pub fn line_break(&mut self) {
        self.flush();
        if !self.pieces.is_empty() {
            self.pieces.push(Piece::Break);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.pieces.iter().all(|p| *p == Piece::Break)
    }

    pub fn finish(mut self) -> Vec<Piece> {
        self.flush();
        while self.pieces.last() == Some(&Piece::Break) {
            self.pieces.pop();
        }
        self.pieces
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.pieces.push(Piece::Word(std::mem::take(&mut self.current)));
        }
    }
}

/// Fill words into lines of at most `width` characters. A word longer than
/// the width gets a line of its own. `width == 0` keeps each paragraph on a
/// single line (apart from forced breaks).
pub fn fill(pieces: &[Piece], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut len = 0;

    for piece in pieces {
        match piece {
            Piece::Word(word) => {
                let word_len = word.chars().count();
                if line.is_empty() {
                    line.push_str(word);
                    len = word_len;
                } else if width > 0 && len + 1 + word_len > width {
                    lines.push(std::mem::take(&mut line));
                    line.push_str(word);
                    len = word_len;
                } else {
                    line.push(' ');
                    line.push_str(word);
                    len += 1 + word_len;
                }
            }
            Piece::Break => {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
            }
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Hang `body` off `marker`: the first line follows the marker (padded to
/// `indent`), later non-blank lines are indented by `indent`.
pub fn hang(marker: &str, indent: usize, body: &[String]) -> Vec<String> {
    let Some((first, rest)) = body.split_first() else {
        return vec![marker.trim_end().to_string()];
    };

    let mut out = Vec::with_capacity(body.len());
    if first.is_empty() {
        out.push(marker.trim_end().to_string());
    } else {
        out.push(format!("{:<indent$}{}", marker, first, indent = indent));
    }
    let pad = " ".repeat(indent);
    for line in rest {
        if line.is_empty() {
            out.push(String::new());
        } else {
            out.push(format!("{}{}", pad, line));
        }
    }
    out
}

/// Width left for text indented by `indent`; never below a readable minimum.
pub fn body_width(width: usize, indent: usize) -> usize {
    const MIN_BODY_WIDTH: usize = 20;
    if width == 0 {
        0
    } else {
        width.saturating_sub(indent).max(MIN_BODY_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<Piece> {
        let mut b = WordBuilder::default();
        b.push_text(text);
        b.finish()
    }

    #[test]
    fn fills_greedily() {
        let lines = fill(&words("aaa bbb ccc ddd"), 7);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn long_word_gets_own_line() {
        let lines = fill(&words("a verylongword b"), 5);
        assert_eq!(lines, vec!["a", "verylongword", "b"]);
    }

    #[test]
    fn zero_width_never_wraps() {
        let lines = fill(&words("one two three four five"), 0);
        assert_eq!(lines, vec!["one two three four five"]);
    }

    #[test]
    fn atoms_are_not_split() {
        let mut b = WordBuilder::default();
        b.push_text("see ");
        b.push_atom(":meth:`the label <.m>`");
        b.push_text(". Done");
        let lines = fill(&b.finish(), 12);
        assert_eq!(lines, vec!["see", ":meth:`the label <.m>`.", "Done"]);
    }

    #[test]
    fn forced_break() {
        let mut b = WordBuilder::default();
        b.push_text("one");
        b.line_break();
        b.push_text("two");
        assert_eq!(fill(&b.finish(), 79), vec!["one", "two"]);
    }

    #[test]
    fn hanging_indent() {
        let body = vec!["first".to_string(), String::new(), "second".to_string()];
        assert_eq!(
            hang(":param x: ", 12, &body),
            vec![":param x:   first", "", "            second"]
        );
        assert_eq!(hang(":returns: ", 10, &[]), vec![":returns:"]);
    }
}
