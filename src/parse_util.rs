use std::str::FromStr;

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of input, expected '{exp}'")]
    UnexpectedEof { exp: char },

    #[error("Expected '{exp}', but got '{got}'")]
    UnexpectedToken { exp: char, got: char },

    #[error("Failed to convert \"{str}\"")]
    Convert { str: String },
}

/// Consumes the slice until a non-ascii whitespace character is reached.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());

    &bytes[i..]
}

/// Drops trailing ascii whitespace.
pub fn trim_end_ws(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);

    &bytes[..i]
}

/// Takes the next character from the slice. If none is found, the slice is left as-is.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    let [b, bytes @ ..] = bytes else {
        return (None, bytes);
    };

    (Some(*b), bytes)
}

/// Like `take_1`, but doesn't consume the token
pub fn peek_1(bytes: &[u8]) -> Option<u8> {
    let [b, _bytes @ ..] = bytes else { return None };

    Some(*b)
}

/// Expects the next character in `bytes` to be `b`. Otherwise leaves `bytes` unchanged.
pub fn expect(b: u8, bytes: &[u8]) -> ParseResult<&[u8]> {
    let (Some(a), bytes) = take_1(bytes) else {
        return Err(ParseError::UnexpectedEof { exp: b as char });
    };

    if a != b {
        return Err(ParseError::UnexpectedToken {
            exp: b as char,
            got: a as char,
        });
    }

    Ok(bytes)
}

/// Advance the slice until `P` is satisfied, without consuming it. If `P` is never satisfied,
/// the whole slice is taken.
///
/// Returns `None` if nothing was taken.
#[inline]
pub fn take_until_fn<P>(p: P, bytes: &[u8]) -> (Option<&[u8]>, &[u8])
where
    P: Fn(u8) -> bool,
{
    let i = bytes.iter().position(|&a| p(a)).unwrap_or(bytes.len());

    if i == 0 {
        (None, bytes)
    } else {
        let (res, bytes) = bytes.split_at(i);

        (Some(res), bytes)
    }
}

/// Advance the slice until byte `b` is found, without consuming it.
pub fn take_until(b: u8, bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    take_until_fn(|a| a == b, bytes)
}

/// Like `take_until`, but stops at the first ascii whitespace character found, without consuming
/// it.
pub fn take_until_ws(bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    take_until_fn(|a| a.is_ascii_whitespace(), bytes)
}

/// Converts `&[u8]` to `T` if `T: FromStr`.
pub fn convert<T: FromStr>(bytes: &[u8]) -> ParseResult<T> {
    let str = String::from_utf8_lossy(bytes);

    str.parse::<T>().map_err(|_| ParseError::Convert {
        str: str.to_string(),
    })
}

/// Parse a whitespace separated list of `x,y` pairs, e.g. `0,1 1,0 1,2`.
pub fn coordinates(mut bytes: &[u8]) -> ParseResult<Vec<(usize, usize)>> {
    let mut coords = Vec::new();

    loop {
        bytes = take_ws(bytes);
        if peek_1(bytes).is_none() {
            break;
        }

        let (Some(x), rest) = take_until(b',', bytes) else {
            return Err(ParseError::UnexpectedToken {
                exp: '0',
                got: ',',
            });
        };
        let rest = expect(b',', rest)?;

        let (Some(y), rest) = take_until_ws(rest) else {
            return Err(ParseError::UnexpectedEof { exp: '0' });
        };

        coords.push((convert(x)?, convert(y)?));
        bytes = rest;
    }

    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::ParseError;

    #[test]
    fn test_take_ws_full_ws() {
        let bytes = b"  ";

        let res = super::take_ws(bytes);

        assert_eq!(res, b"")
    }

    #[test]
    fn test_trim_end_ws() {
        assert_eq!(super::trim_end_ws(b" a b \t\n"), b" a b");
        assert_eq!(super::trim_end_ws(b"   "), b"");
    }

    #[test]
    fn test_take_until_missing() {
        let (res, rest) = super::take_until(b'=', b"abc");

        assert_eq!(res, Some(b"abc".as_slice()));
        assert_eq!(rest, b"");
    }

    #[test]
    fn test_coordinates() {
        let coords = super::coordinates(b" 0,1 1,0\n\t12,3 ").unwrap();

        assert_eq!(coords, vec![(0, 1), (1, 0), (12, 3)]);
        assert!(super::coordinates(b"").unwrap().is_empty());
    }

    #[test]
    fn test_coordinates_errors() {
        assert_eq!(
            super::coordinates(b"0,1 2"),
            Err(ParseError::UnexpectedEof { exp: ',' })
        );
        assert_eq!(
            super::coordinates(b"0,"),
            Err(ParseError::UnexpectedEof { exp: '0' })
        );
        assert_eq!(
            super::coordinates(b"a,1"),
            Err(ParseError::Convert {
                str: "a".to_string()
            })
        );
    }
}
