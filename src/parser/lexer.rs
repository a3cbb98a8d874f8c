// Lexer utilities for the event script

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{char, space0, space1, u32 as dec_u32, u64 as dec_u64},
    combinator::recognize,
    number::complete::double,
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};

/// Parse and consume surrounding spaces and tabs
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(space0, inner, space0)
}

/// A keyword followed by at least one space
pub fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(word), space1)
}

/// Parse an identifier (attribute, variable or chart name)
/// Format: [a-zA-Z_][a-zA-Z0-9_]*
pub fn identifier(input: &str) -> IResult<&str, String> {
    let (rest, ident) = recognize(take_while1(|c: char| c.is_alphanumeric() || c == '_'))(input)?;

    // Validate first character
    if let Some(first) = ident.chars().next() {
        if !first.is_alphabetic() && first != '_' {
            return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Alpha)));
        }
    }

    Ok((rest, ident.to_string()))
}

/// Parse a string literal
/// Format: "..."
pub fn string_literal(input: &str) -> IResult<&str, String> {
    let (input, content) = delimited(
        char('"'),
        take_while1(|c| c != '"'),
        char('"'),
    )(input)?;

    Ok((input, content.to_string()))
}

/// Parse a number literal (integer or float)
pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// Parse a clock stamp
/// Format: @<ms>
pub fn timestamp(input: &str) -> IResult<&str, u64> {
    preceded(char('@'), dec_u64)(input)
}

/// Parse a viewport size
/// Format: <width>x<height>
pub fn dimensions(input: &str) -> IResult<&str, (u32, u32)> {
    separated_pair(dec_u32, char('x'), dec_u32)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("gpa"), Ok(("", "gpa".to_string())));
        assert_eq!(identifier("pie 10"), Ok((" 10", "pie".to_string())));
        assert_eq!(identifier("_bar"), Ok(("", "_bar".to_string())));
    }

    #[test]
    fn test_identifier_invalid_start_with_number() {
        assert!(identifier("123abc").is_err());
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal(r#""3.50 - 4.00""#), Ok(("", "3.50 - 4.00".to_string())));
        assert_eq!(string_literal(r#""Year 1" rest"#), Ok((" rest", "Year 1".to_string())));
    }

    #[test]
    fn test_string_literal_unclosed() {
        assert!(string_literal(r#""hello"#).is_err());
        assert!(string_literal(r#"hello""#).is_err());
    }

    #[test]
    fn test_number_literal() {
        assert_eq!(number_literal("42"), Ok(("", 42.0)));
        assert_eq!(number_literal("-3.5"), Ok(("", -3.5)));
    }

    #[test]
    fn test_ws() {
        let mut parser = ws(tag("leave"));
        assert_eq!(parser("  leave\t"), Ok(("", "leave")));
        assert_eq!(parser("leave"), Ok(("", "leave")));
    }

    #[test]
    fn test_keyword_requires_space() {
        assert_eq!(keyword("tick")("tick @5"), Ok(("@5", "tick")));
        assert!(keyword("tick")("tick@5").is_err());
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(timestamp("@120"), Ok(("", 120)));
        assert!(timestamp("120").is_err());
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(dimensions("700x400"), Ok(("", (700, 400))));
        assert!(dimensions("700 x 400").is_err());
    }
}
