//! Scanner that splits composed text into plain text and math spans.

mod lexer;

pub use lexer::{display_math, inline_math, Token};

/// The delimiter style of a math span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `$...$`
    Inline,
    /// `$$...$$`
    Display,
}

impl Delimiter {
    /// The marker written on each side of the payload.
    pub fn marker(self) -> &'static str {
        match self {
            Delimiter::Inline => "$",
            Delimiter::Display => "$$",
        }
    }

    /// Wrap a raw payload in this delimiter.
    pub fn wrap(self, payload: &str) -> String {
        let marker = self.marker();
        format!("{marker}{payload}{marker}")
    }

    fn lex(self, input: &str) -> Option<(&str, Token<'_>)> {
        let result = match self {
            Delimiter::Inline => inline_math(input),
            Delimiter::Display => display_math(input),
        };
        result.ok()
    }
}

/// A math span found in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathSpan<'a> {
    pub delimiter: Delimiter,
    /// Text between the delimiters, untrimmed.
    pub payload: &'a str,
    /// The whole matched substring, delimiters included.
    pub source: &'a str,
}

/// A piece of scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Math(MathSpan<'a>),
}

/// Whether the text contains a delimiter character at all.
///
/// This is the cheap test used to decide whether a preview is worth showing;
/// it does not check that a span actually parses.
pub fn has_delimiter(text: &str) -> bool {
    text.contains('$')
}

/// Split `input` into text and spans of a single delimiter style.
///
/// Spans are found left to right and never overlap. A marker preceded by an
/// odd number of backslashes is escaped and never opens a span. When a
/// candidate opener fails to lex, scanning resumes at the next byte, so
/// `$$x$` still yields the inline span `$x$`.
pub fn scan(input: &str, delimiter: Delimiter) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = input[pos..].find('$') {
        let at = pos + offset;

        if !is_escaped(input, at) {
            if let Some((rest, token)) = delimiter.lex(&input[at..]) {
                let end = input.len() - rest.len();
                if text_start < at {
                    segments.push(Segment::Text(&input[text_start..at]));
                }
                segments.push(Segment::Math(MathSpan {
                    delimiter,
                    payload: token.payload(),
                    source: &input[at..end],
                }));
                text_start = end;
                pos = end;
                continue;
            }
        }

        pos = at + 1;
    }

    if text_start < input.len() {
        segments.push(Segment::Text(&input[text_start..]));
    }

    segments
}

/// Collect only the math spans of one delimiter style.
pub fn spans(input: &str, delimiter: Delimiter) -> Vec<MathSpan<'_>> {
    scan(input, delimiter)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Math(span) => Some(span),
            Segment::Text(_) => None,
        })
        .collect()
}

fn is_escaped(input: &str, at: usize) -> bool {
    let backslashes = input.as_bytes()[..at]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    backslashes % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math(delimiter: Delimiter, payload: &'static str, source: &'static str) -> Segment<'static> {
        Segment::Math(MathSpan {
            delimiter,
            payload,
            source,
        })
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            scan("no math here", Delimiter::Inline),
            vec![Segment::Text("no math here")]
        );
        assert!(scan("", Delimiter::Display).is_empty());
    }

    #[test]
    fn test_inline_spans() {
        let segments = scan("Area: $\\pi r^2$ and $x$.", Delimiter::Inline);
        assert_eq!(
            segments,
            vec![
                Segment::Text("Area: "),
                math(Delimiter::Inline, "\\pi r^2", "$\\pi r^2$"),
                Segment::Text(" and "),
                math(Delimiter::Inline, "x", "$x$"),
                Segment::Text("."),
            ]
        );
    }

    #[test]
    fn test_display_spans_are_shortest() {
        let found = spans("$$a$$ b $$c$$", Delimiter::Display);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].payload, "a");
        assert_eq!(found[1].payload, "c");
    }

    #[test]
    fn test_inline_scan_ignores_display_openers() {
        // The inline pass sees `$$x$` and matches from the second marker.
        assert_eq!(
            scan("$$x$", Delimiter::Inline),
            vec![Segment::Text("$"), math(Delimiter::Inline, "x", "$x$")]
        );
    }

    #[test]
    fn test_escaped_opener() {
        assert_eq!(
            scan(r"costs \$5 or $y$", Delimiter::Inline),
            vec![
                Segment::Text(r"costs \$5 or "),
                math(Delimiter::Inline, "y", "$y$"),
            ]
        );
        // A doubled backslash leaves the marker live.
        assert_eq!(spans(r"\\$z$", Delimiter::Inline).len(), 1);
    }

    #[test]
    fn test_unmatched_marker_is_text() {
        assert_eq!(
            scan("price $5\nnext $", Delimiter::Inline),
            vec![Segment::Text("price $5\nnext $")]
        );
    }

    #[test]
    fn test_currency_is_a_false_positive() {
        // Two bare currency amounts on one line read as a span.
        assert_eq!(spans("$5 and $6", Delimiter::Inline).len(), 1);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(Delimiter::Inline.wrap("\\pi"), "$\\pi$");
        assert_eq!(Delimiter::Display.wrap("x"), "$$x$$");
    }
}
