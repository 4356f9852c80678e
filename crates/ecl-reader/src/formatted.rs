//! Scanner for the formatted (ASCII) rendition of the container.
//!
//! A header reads `'NAME    '  <count>  'TAG '` and is followed by `count`
//! whitespace separated value tokens. Line breaks carry no meaning here.

use std::io::{Read, Seek};

use crate::{
    array::EclArray,
    error::{EclError, Result},
    record::{Header, PosReader},
    types::ElementType,
};

#[derive(Debug, PartialEq)]
enum Token {
    Quoted(String),
    Bare(String),
}

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Skips whitespace and reports whether the next byte opens a quoted token.
pub(crate) fn starts_with_quote<R: Read + Seek>(src: &mut PosReader<R>) -> Result<Option<bool>> {
    while let Some(b) = src.peek_byte()? {
        if !is_space(b) {
            return Ok(Some(b == b'\''));
        }
        src.bump();
    }
    Ok(None)
}

fn next_token<R: Read + Seek>(src: &mut PosReader<R>) -> Result<Option<Token>> {
    if starts_with_quote(src)?.is_none() {
        return Ok(None);
    }

    let mut raw = Vec::new();
    if src.peek_byte()? == Some(b'\'') {
        let start = src.position();
        src.bump();
        loop {
            match src.peek_byte()? {
                Some(b'\'') => {
                    src.bump();
                    break;
                }
                Some(b) => {
                    raw.push(b);
                    src.bump();
                }
                None => {
                    return Err(EclError::format(format!(
                        "unterminated string starting at offset {start}"
                    )))
                }
            }
        }
        return Ok(Some(Token::Quoted(String::from_utf8_lossy(&raw).into_owned())));
    }

    while let Some(b) = src.peek_byte()? {
        if is_space(b) {
            break;
        }
        raw.push(b);
        src.bump();
    }
    Ok(Some(Token::Bare(String::from_utf8_lossy(&raw).into_owned())))
}

fn expect_token<R: Read + Seek>(src: &mut PosReader<R>, what: &str) -> Result<Token> {
    next_token(src)?.ok_or_else(|| {
        EclError::format(format!("file truncated in {what} at offset {}", src.position()))
    })
}

/// Formatted counterpart of [`PosReader::read_header`].
pub(crate) fn read_header<R: Read + Seek>(
    src: &mut PosReader<R>,
    offset: u64,
) -> Result<Option<(Header, u64)>> {
    src.seek(offset)?;
    let name = match next_token(src)? {
        None => return Ok(None),
        Some(Token::Quoted(name)) => name.trim_end().to_string(),
        Some(Token::Bare(t)) => {
            return Err(EclError::format(format!(
                "expected quoted array name at offset {offset}, found {t:?}"
            )))
        }
    };

    let element_count = match expect_token(src, "array header")? {
        Token::Bare(t) => {
            let count = t.parse::<i32>().map_err(|_| {
                EclError::format(format!("array {name} has invalid element count {t:?}"))
            })?;
            usize::try_from(count).map_err(|_| {
                EclError::format(format!("array {name} declares negative element count {count}"))
            })?
        }
        Token::Quoted(t) => {
            return Err(EclError::format(format!(
                "array {name}: expected element count, found {t:?}"
            )))
        }
    };

    let element_type = match expect_token(src, "array header")? {
        Token::Quoted(tag) => ElementType::from_tag(tag.as_bytes()).ok_or_else(|| {
            EclError::format(format!("array {name} has unrecognised type tag {tag:?}"))
        })?,
        Token::Bare(t) => {
            return Err(EclError::format(format!(
                "array {name}: expected quoted type tag, found {t:?}"
            )))
        }
    };

    let header = Header::new(name, element_type, element_count)?;
    Ok(Some((header, src.position())))
}

/// Steps over `count` value tokens, returning the offset after the last one.
pub(crate) fn skip_values<R: Read + Seek>(
    src: &mut PosReader<R>,
    start: u64,
    ty: ElementType,
    count: usize,
) -> Result<u64> {
    src.seek(start)?;
    if ty != ElementType::Message {
        for _ in 0..count {
            expect_token(src, "array values")?;
        }
    }
    Ok(src.position())
}

pub(crate) fn read_values<R: Read + Seek>(
    src: &mut PosReader<R>,
    start: u64,
    ty: ElementType,
    count: usize,
) -> Result<EclArray> {
    src.seek(start)?;
    if ty == ElementType::Message {
        return Ok(EclArray::Message);
    }

    let mut tokens = Vec::with_capacity(count);
    for _ in 0..count {
        tokens.push(expect_token(src, "array values")?);
    }

    let array = match ty {
        ElementType::Int32 => EclArray::Int32(parse_all(tokens, |t| t.parse::<i32>().ok())?),
        ElementType::Float32 => {
            EclArray::Float32(parse_all(tokens, |t| fortran_float(t).parse::<f32>().ok())?)
        }
        ElementType::Float64 => {
            EclArray::Float64(parse_all(tokens, |t| fortran_float(t).parse::<f64>().ok())?)
        }
        ElementType::Bool => EclArray::Bool(parse_all(tokens, |t| match t {
            "T" => Some(true),
            "F" => Some(false),
            _ => None,
        })?),
        ElementType::FixedString(width) => {
            let values = tokens
                .into_iter()
                .map(|t| match t {
                    Token::Quoted(s) if s.len() > width as usize => Err(EclError::format(
                        format!("string {s:?} does not fit in {width} bytes"),
                    )),
                    Token::Quoted(s) => Ok(s.trim_end_matches(' ').to_string()),
                    Token::Bare(s) => Err(EclError::format(format!(
                        "expected quoted string value, found {s:?}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;
            EclArray::FixedString { width, values }
        }
        ElementType::Message => EclArray::Message,
    };
    Ok(array)
}

fn parse_all<T>(tokens: Vec<Token>, parse: impl Fn(&str) -> Option<T>) -> Result<Vec<T>> {
    tokens
        .into_iter()
        .map(|t| match t {
            Token::Bare(s) => {
                parse(&s).ok_or_else(|| EclError::format(format!("invalid value {s:?}")))
            }
            Token::Quoted(s) => Err(EclError::format(format!(
                "expected a number or logical, found string {s:?}"
            ))),
        })
        .collect()
}

// Fortran writes double precision exponents with `D`.
fn fortran_float(t: &str) -> String {
    t.replace(['D', 'd'], "E")
}
