//! nom lexers for the JSON leaves. Structure (brackets, commas, colons) is tracked by the
//! reader's scope stack, not here.
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while, take_while_m_n},
    character::complete::{char, digit1, one_of},
    combinator::{cut, map_res, opt, recognize, value},
    error::{context, ErrorKind, ParseError, VerboseError, VerboseErrorKind},
    sequence::{pair, preceded, terminated, tuple},
    Err, IResult,
};

pub(super) type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// `true`, `false`, or `null`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) enum Lit {
    True,
    False,
    Null,
}

/// JSON insignificant whitespace. Note this is narrower than `char::is_whitespace`.
pub(super) fn ws<'a>(i: &'a str) -> Res<'a, &'a str> {
    take_while(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r'))(i)
}

pub(super) fn literal<'a>(i: &'a str) -> Res<'a, Lit> {
    context(
        "literal",
        alt((
            value(Lit::True, tag("true")),
            value(Lit::False, tag("false")),
            value(Lit::Null, tag("null")),
        )),
    )(i)
}

/// Recognizes number text; conversion is left to [`Number`](crate::Number)'s `FromStr`.
pub(super) fn number<'a>(i: &'a str) -> Res<'a, &'a str> {
    context(
        "number",
        recognize(tuple((
            opt(char('-')),
            alt((tag("0"), digit1)),
            opt(pair(char('.'), cut(digit1))),
            opt(tuple((one_of("eE"), opt(one_of("+-")), cut(digit1)))),
        ))),
    )(i)
}

pub(super) fn string<'a>(i: &'a str) -> Res<'a, String> {
    context(
        "string",
        preceded(char('"'), cut(terminated(string_body, char('"')))),
    )(i)
}

fn string_body<'a>(i: &'a str) -> Res<'a, String> {
    let mut out = String::new();
    let mut rest = i;

    loop {
        let (r, chunk) = take_till(|c: char| c == '"' || c == '\\' || (c as u32) < 0x20)(rest)?;
        out.push_str(chunk);
        rest = r;

        match rest.strip_prefix('\\') {
            Some(r) => {
                let (r, ch) = escape(r)?;
                out.push(ch);
                rest = r;
            }
            None => return Ok((rest, out)),
        }
    }
}

fn escape<'a>(i: &'a str) -> Res<'a, char> {
    context(
        "escape sequence",
        alt((
            value('"', char('"')),
            value('\\', char('\\')),
            value('/', char('/')),
            value('\u{8}', char('b')),
            value('\u{c}', char('f')),
            value('\n', char('n')),
            value('\r', char('r')),
            value('\t', char('t')),
            preceded(char('u'), unicode),
        )),
    )(i)
}

fn hex4<'a>(i: &'a str) -> Res<'a, u32> {
    map_res(
        take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()),
        |s: &str| u32::from_str_radix(s, 16),
    )(i)
}

/// `\uXXXX`, joining UTF-16 surrogate pairs.
fn unicode<'a>(i: &'a str) -> Res<'a, char> {
    let (rest, hi) = hex4(i)?;

    let (rest, code) = if (0xD800..0xDC00).contains(&hi) {
        let (rest, lo) = preceded(tag("\\u"), hex4)(rest)?;
        if !(0xDC00..0xE000).contains(&lo) {
            return Err(fail(i));
        }
        (rest, 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00))
    } else {
        (rest, hi)
    };

    char::from_u32(code).map(|c| (rest, c)).ok_or_else(|| fail(i))
}

fn fail<'a>(i: &'a str) -> Err<VerboseError<&'a str>> {
    Err::Failure(VerboseError::from_error_kind(i, ErrorKind::Char))
}

/// Map a nom error into `(remaining input at the error, message)`.
pub(super) fn describe<'a>(e: Err<VerboseError<&'a str>>, input: &'a str) -> (&'a str, String) {
    let errs = match e {
        Err::Error(e) | Err::Failure(e) => e.errors,
        Err::Incomplete(_) => return (&input[input.len()..], "unexpected end of input".into()),
    };

    let at = errs.first().map(|(at, _)| *at).unwrap_or(input);
    let ctx = errs.iter().find_map(|(_, k)| match k {
        VerboseErrorKind::Context(s) => Some(*s),
        _ => None,
    });

    let msg = match (errs.first().map(|(_, k)| k), ctx) {
        (Some(VerboseErrorKind::Char(c)), ctx) => {
            let detail = match at.chars().next() {
                Some(found) => format!("expected '{}', found '{}'", c, found),
                None => format!("expected '{}', got end of input", c),
            };
            match ctx {
                Some(ctx) => format!("{} in {}", detail, ctx),
                None => detail,
            }
        }
        (_, Some(ctx)) => format!("invalid {}", ctx),
        (Some(VerboseErrorKind::Nom(k)), None) => format!("invalid input ({:?})", k),
        _ => "invalid input".to_string(),
    };

    (at, msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(number("0"), Ok(("", "0")));
        assert_eq!(number("-12.5e+3,"), Ok((",", "-12.5e+3")));
        assert_eq!(number("01"), Ok(("1", "0")));
        assert_eq!(number("3]"), Ok(("]", "3")));
        assert!(number("-").is_err());
        assert!(number("1.").is_err());
        assert!(number("1e").is_err());
        assert!(number(".5").is_err());
    }

    #[test]
    fn strings() {
        assert_eq!(string(r#""hello" "#), Ok((" ", "hello".to_string())));
        assert_eq!(string(r#""""#), Ok(("", String::new())));
        assert_eq!(
            string(r#""a\"b\\c\/d\n\t""#),
            Ok(("", "a\"b\\c/d\n\t".to_string()))
        );
        assert_eq!(string(r#""\u00e9""#), Ok(("", "é".to_string())));
        assert_eq!(string(r#""\ud83d\ude00""#), Ok(("", "😀".to_string())));
        assert!(string(r#""\ud83d""#).is_err());
        assert!(string(r#""\x""#).is_err());
        assert!(string("\"raw\nnewline\"").is_err());
        assert!(string(r#""unterminated"#).is_err());
    }

    #[test]
    fn literals() {
        assert_eq!(literal("true,"), Ok((",", Lit::True)));
        assert_eq!(literal("false"), Ok(("", Lit::False)));
        assert_eq!(literal("null]"), Ok(("]", Lit::Null)));
        assert!(literal("nul").is_err());
    }

    #[test]
    fn whitespace() {
        assert_eq!(ws(" \t\r\n x"), Ok(("x", " \t\r\n ")));
        assert_eq!(ws("x"), Ok(("x", "")));
    }

    #[test]
    fn described_errors() {
        let input = r#""abc"#;
        let e = string(input).unwrap_err();
        let (at, msg) = describe(e, input);
        assert_eq!(at, "");
        assert_eq!(msg, "expected '\"', got end of input in string");

        let input = "1.x";
        let e = number(input).unwrap_err();
        assert_eq!(describe(e, input), ("x", "invalid number".to_string()));
    }
}
