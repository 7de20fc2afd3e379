//! Markup used by the generator to embed call-to-action buttons in a post.
//!
//! A directive looks like `[Button:Buy Now]`. Everything else is literal text,
//! and each line break is surfaced as its own [`Segment::Break`] so renderers
//! never have to reinterpret whitespace.

const DIRECTIVE_OPEN: &str = "[Button:";
const DIRECTIVE_CLOSE: char = ']';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Break,
    Button { label: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Newline,
    /// Raw inner text of a directive, untrimmed.
    Directive(&'a str),
}

/// Memo for "next match at or after `pos`" while `pos` only moves forward.
/// A hit stays valid until the scan passes it, so every byte is searched at
/// most once per lookahead.
#[derive(Default)]
struct Lookahead {
    searched_from: Option<usize>,
    hit: Option<usize>,
}

impl Lookahead {
    fn find(&mut self, raw: &str, pos: usize, search: impl Fn(&str) -> Option<usize>) -> Option<usize> {
        let fresh = match (self.searched_from, self.hit) {
            (None, _) => false,
            (Some(_), Some(hit)) => pos <= hit,
            (Some(from), None) => pos >= from,
        };
        if !fresh {
            self.searched_from = Some(pos);
            self.hit = search(&raw[pos..]).map(|i| i + pos);
        }
        self.hit
    }
}

/// Split raw post text into tokens, left to right, without losing characters
/// outside recognized directives.
pub fn tokenize(raw: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut newline = Lookahead::default();
    let mut close = Lookahead::default();
    let mut opener = Lookahead::default();

    while pos < raw.len() {
        let rest = &raw[pos..];
        if rest.starts_with("\r\n") {
            tokens.push(Token::Newline);
            pos += 2;
            continue;
        }
        if rest.starts_with('\n') {
            tokens.push(Token::Newline);
            pos += 1;
            continue;
        }

        if rest.starts_with(DIRECTIVE_OPEN) {
            let body = pos + DIRECTIVE_OPEN.len();
            // A directive must close on the same line
            match close.find(raw, body, |s| s.find(&[DIRECTIVE_CLOSE, '\n'][..])) {
                Some(end) if raw[end..].starts_with(DIRECTIVE_CLOSE) => {
                    tokens.push(Token::Directive(&raw[body..end]));
                    pos = end + DIRECTIVE_CLOSE.len_utf8();
                }
                _ => {
                    tokens.push(Token::Text(DIRECTIVE_OPEN));
                    pos = body;
                }
            }
            continue;
        }

        // Plain run up to the next line break or directive opener. The opener
        // search skips the first char so a run always makes progress.
        let first = rest.chars().next().map_or(0, char::len_utf8);
        let newline_at = newline.find(raw, pos, |s| s.find('\n'));
        let directive_at = opener.find(raw, pos + first, |s| s.find(DIRECTIVE_OPEN));
        let end = match (newline_at, directive_at) {
            (Some(n), Some(d)) => n.min(d),
            (Some(n), None) => n,
            (None, Some(d)) => d,
            (None, None) => raw.len(),
        };

        let mut run_end = end;
        if Some(end) == newline_at && raw[pos..end].ends_with('\r') {
            // Leave "\r\n" for the newline branch
            run_end -= 1;
        }
        if run_end > pos {
            tokens.push(Token::Text(&raw[pos..run_end]));
        }
        pos = run_end;
    }

    tokens
}

/// Parse generated post text into renderable segments.
///
/// Pure: the same input always yields the same output.
pub fn parse(raw: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut pending = String::new();

    for token in tokenize(raw) {
        match token {
            Token::Text(text) => pending.push_str(text),
            Token::Newline => {
                flush_text(&mut pending, &mut segments);
                segments.push(Segment::Break);
            }
            Token::Directive(inner) => {
                flush_text(&mut pending, &mut segments);
                segments.push(Segment::Button {
                    label: inner.trim().to_string(),
                });
            }
        }
    }
    flush_text(&mut pending, &mut segments);

    segments
}

fn flush_text(pending: &mut String, segments: &mut Vec<Segment>) {
    if !pending.is_empty() {
        segments.push(Segment::Text(std::mem::take(pending)));
    }
}

/// Labels of every button, in order of appearance.
pub fn button_labels(segments: &[Segment]) -> Vec<&str> {
    segments
        .iter()
        .filter_map(|s| match s {
            Segment::Button { label } => Some(label.as_str()),
            _ => None,
        })
        .collect()
}

/// Text suitable for sharing: directives collapse to their labels.
pub fn plain_text(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Break => out.push('\n'),
            Segment::Button { label } => out.push_str(label),
        }
    }
    out
}
