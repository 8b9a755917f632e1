//! Span-level lexers for `$...$` and `$$...$$` math.
//!
//! Each lexer only recognises a span that starts at the beginning of its
//! input; the driver in the parent module decides where to try them.

use nom::{
    bytes::complete::tag,
    character::complete::char,
    combinator::not,
    error::{Error, ErrorKind},
    IResult, Parser,
};

/// A math token recognised at the start of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    InlineMath(&'a str),  // $...$
    DisplayMath(&'a str), // $$...$$
}

impl<'a> Token<'a> {
    /// The raw payload between the delimiters.
    pub fn payload(&self) -> &'a str {
        match self {
            Token::InlineMath(s) | Token::DisplayMath(s) => s,
        }
    }
}

/// Parse inline math (`$...$`).
///
/// The payload is non-empty, never spans a newline and ends at the first
/// unescaped `$`.
pub fn inline_math(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('$').parse(input)?;
    let (input, _) = not(char('$')).parse(input)?; // Not display math
    let (input, content) = inline_payload(input)?;
    let (input, _) = char('$').parse(input)?;
    Ok((input, Token::InlineMath(content)))
}

/// Parse display math (`$$...$$`).
///
/// The payload holds at least one character and ends at the first unescaped
/// `$$` after it, so the shortest span wins.
pub fn display_math(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = tag("$$").parse(input)?;
    let (input, content) = display_payload(input)?;
    let (input, _) = tag("$$").parse(input)?;
    Ok((input, Token::DisplayMath(content)))
}

// The byte-level walks below only look at ASCII bytes, which never occur
// inside a multi-byte UTF-8 sequence, so every split lands on a char boundary.

fn inline_payload(input: &str) -> IResult<&str, &str> {
    let bytes = input.as_bytes();
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            break;
        }
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' => escaped = true,
            b'$' => return Ok((&input[i..], &input[..i])),
            _ => {}
        }
    }

    Err(nom::Err::Error(Error::new(input, ErrorKind::TakeUntil)))
}

fn display_payload(input: &str) -> IResult<&str, &str> {
    let bytes = input.as_bytes();
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' => escaped = true,
            b'$' if i > 0 && bytes.get(i + 1) == Some(&b'$') => {
                return Ok((&input[i..], &input[..i]));
            }
            _ => {}
        }
    }

    Err(nom::Err::Error(Error::new(input, ErrorKind::TakeUntil)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_math() {
        assert_eq!(
            inline_math("$E = mc^2$ rest"),
            Ok((" rest", Token::InlineMath("E = mc^2")))
        );
    }

    #[test]
    fn test_inline_rejects_newline_and_empty() {
        assert!(inline_math("$a\nb$").is_err());
        assert!(inline_math("$$").is_err());
        assert!(inline_math("$unclosed").is_err());
    }

    #[test]
    fn test_inline_skips_escaped_dollar() {
        assert_eq!(
            inline_math(r"$a \$ b$!"),
            Ok(("!", Token::InlineMath(r"a \$ b")))
        );
        // An escaped backslash does not escape the closer.
        assert_eq!(
            inline_math(r"$a\\$b"),
            Ok(("b", Token::InlineMath(r"a\\")))
        );
    }

    #[test]
    fn test_display_math() {
        assert_eq!(
            display_math("$$\\int_0^1 x dx$$"),
            Ok(("", Token::DisplayMath("\\int_0^1 x dx")))
        );
    }

    #[test]
    fn test_display_is_non_greedy_and_multiline() {
        assert_eq!(
            display_math("$$a\n+b$$ mid $$c$$"),
            Ok((" mid $$c$$", Token::DisplayMath("a\n+b")))
        );
    }

    #[test]
    fn test_display_needs_payload() {
        assert!(display_math("$$$$").is_err());
        // The first payload character may itself be a marker.
        assert_eq!(
            display_math("$$$x$$"),
            Ok(("", Token::DisplayMath("$x")))
        );
    }

    #[test]
    fn test_multibyte_payload() {
        assert_eq!(
            inline_math("$α + β$ ok"),
            Ok((" ok", Token::InlineMath("α + β")))
        );
    }
}
