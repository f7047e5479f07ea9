//! Character data escaping.
//!
//! ESIS data lines use backslash escapes:
//!
//! | escape    | meaning                                              |
//! |-----------|------------------------------------------------------|
//! | `\n`      | newline (record end)                                 |
//! | `\\`      | backslash                                            |
//! | `\ooo`    | byte with octal value `ooo`; `\012` (record start) is dropped |
//! | `\#ddd;`  | numeric reference; ≤ 255 is a byte, else UTF-8 of the code point |
//!
//! Anything malformed is kept literally. [`encode`] is the inverse of
//! [`decode`] and never produces the record-start marker.
//!
//! XML and SGML output uses character references instead, see
//! [`write_markup`].

use std::borrow::Cow;
use std::io::{self, Write};

/// Octal value of the record-start marker, contributes no data.
pub const RECORD_START: u32 = 0o12;

/// Decode an ESIS data field.
///
/// Borrows when there is nothing to unescape.
pub fn decode(field: &[u8]) -> Cow<'_, [u8]> {
    if memchr::memchr(b'\\', field).is_none() {
        return Cow::Borrowed(field);
    }
    let mut out = Vec::with_capacity(field.len());
    decode_into(field, &mut out);
    Cow::Owned(out)
}

/// Decode an ESIS data field, appending to `out`.
pub fn decode_into(field: &[u8], out: &mut Vec<u8>) {
    let mut pos = 0;
    while let Some(off) = memchr::memchr(b'\\', &field[pos..]) {
        out.extend_from_slice(&field[pos..pos + off]);
        pos += off;
        pos += decode_escape(&field[pos..], out);
    }
    out.extend_from_slice(&field[pos..]);
}

/// Decode one escape at the start of `esc` (which begins with `\`).
/// Returns the number of bytes consumed.
fn decode_escape(esc: &[u8], out: &mut Vec<u8>) -> usize {
    match esc.get(1) {
        Some(b'n') => {
            out.push(b'\n');
            2
        }
        Some(b'\\') => {
            out.push(b'\\');
            2
        }
        Some(b'0'..=b'7') => match octal3(&esc[1..]) {
            Some(RECORD_START) => 4,
            Some(value) if value <= 0xFF => {
                out.push(value as u8);
                4
            }
            _ => literal(out),
        },
        Some(b'#') => match numeric(&esc[2..]) {
            Some((value, used)) => {
                if value <= 0xFF {
                    out.push(value as u8);
                } else if let Some(c) = char::from_u32(value) {
                    let mut utf8 = [0u8; 4];
                    out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                } else {
                    return literal(out);
                }
                2 + used
            }
            None => literal(out),
        },
        _ => literal(out),
    }
}

#[inline]
fn literal(out: &mut Vec<u8>) -> usize {
    out.push(b'\\');
    1
}

/// Exactly three octal digits.
fn octal3(digits: &[u8]) -> Option<u32> {
    let d = digits.get(..3)?;
    d.iter().try_fold(0u32, |acc, &b| match b {
        b'0'..=b'7' => Some(acc * 8 + u32::from(b - b'0')),
        _ => None,
    })
}

/// Decimal digits terminated by `;`. Returns the value and bytes used
/// (digits plus the semicolon).
fn numeric(rest: &[u8]) -> Option<(u32, usize)> {
    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || rest.get(digits) != Some(&b';') {
        return None;
    }
    let value = rest[..digits].iter().try_fold(0u32, |acc, &b| {
        acc.checked_mul(10)?.checked_add(u32::from(b - b'0'))
    })?;
    Some((value, digits + 1))
}

/// Encode bytes for an ESIS data field (no leading `-`, no newline).
pub fn encode(data: &[u8]) -> Cow<'_, [u8]> {
    if !data.iter().any(|&b| needs_escape(b)) {
        return Cow::Borrowed(data);
    }
    let mut out = Vec::with_capacity(data.len() + 8);
    encode_into(data, &mut out);
    Cow::Owned(out)
}

#[inline]
fn needs_escape(b: u8) -> bool {
    b < 0x20 || b == b'\\'
}

/// Encode bytes for an ESIS data field, appending to `out`.
pub fn encode_into(data: &[u8], out: &mut Vec<u8>) {
    for &b in data {
        match b {
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b if b < 0x20 => {
                let octal = [b'0' + (b >> 6), b'0' + ((b >> 3) & 7), b'0' + (b & 7)];
                out.push(b'\\');
                out.extend_from_slice(&octal);
            }
            b => out.push(b),
        }
    }
}

/// Which bytes [`write_markup`] turns into references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// `& < > "` and control bytes other than newline (PCDATA, attribute values)
    Text,
    /// Like `Text`, newline also becomes `&#10;` (canonical attribute values)
    TextNewlines,
    /// Only control bytes other than newline (CDATA)
    Controls,
}

impl Markup {
    #[inline]
    fn entity(self, b: u8) -> Option<&'static [u8]> {
        match (self, b) {
            (Markup::Controls, _) => None,
            (_, b'&') => Some(b"&amp;"),
            (_, b'<') => Some(b"&lt;"),
            (_, b'>') => Some(b"&gt;"),
            (_, b'"') => Some(b"&quot;"),
            (Markup::TextNewlines, b'\n') => Some(b"&#10;"),
            _ => None,
        }
    }
}

/// Write `data` for XML or SGML output, escaping per `mode`.
pub fn write_markup(out: &mut dyn Write, data: &[u8], mode: Markup) -> io::Result<()> {
    let mut run = 0;
    for (i, &b) in data.iter().enumerate() {
        let entity = mode.entity(b);
        let control = b < 0x20 && b != b'\n';
        if entity.is_none() && !control {
            continue;
        }
        out.write_all(&data[run..i])?;
        match entity {
            Some(entity) => out.write_all(entity)?,
            None => write!(out, "&#{b};")?,
        }
        run = i + 1;
    }
    out.write_all(&data[run..])
}
