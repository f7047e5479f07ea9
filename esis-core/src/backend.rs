//! Output back ends for the [`Writer`](crate::writer::Writer).
//!
//! The writer front end stages attributes, validates names and drops
//! empty data; a back end only formats. One back end is chosen when the
//! writer is built and every event goes through it:
//!
//! ```text
//!                       ┌─▶ EsisBackend   Aid CDATA x1 / (para / -Hello / )para
//! Writer ─ emit_tag ────┼─▶ XmlBackend    <para id="x1">Hello</para>
//!          emit_data    └─▶ SgmlBackend   <para id="x1">Hello</para>
//!          emit_pi
//! ```

use std::io::{self, Write};
use std::str::FromStr;

use crate::config::Options;
use crate::escape::{self, Markup};
use crate::event::Attribute;

/// What a tag event opens or closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Start,
    /// Start immediately followed by end
    Empty,
    End,
}

/// How character data is to be escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// Parsed character data; markup characters are escaped.
    Escaped,
    /// Raw character data; only control bytes are escaped.
    Raw,
}

/// Output format of a writer.
pub trait Backend {
    /// Write a start, empty or end tag. `attrs` is empty for `End`; the
    /// back end may reorder it.
    fn emit_tag(
        &mut self,
        out: &mut dyn Write,
        kind: TagKind,
        options: Options,
        name: &[u8],
        attrs: &mut [Attribute<'_>],
    ) -> io::Result<()>;

    /// Write one non-empty run of character data.
    fn emit_data(
        &mut self,
        out: &mut dyn Write,
        kind: DataKind,
        options: Options,
        data: &[u8],
    ) -> io::Result<()>;

    /// Write a processing instruction.
    fn emit_pi(&mut self, out: &mut dyn Write, options: Options, text: &[u8])
        -> io::Result<()>;
}

/// The built-in back ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    #[default]
    Esis,
    Xml,
    Sgml,
}

impl Format {
    pub fn backend(self) -> Box<dyn Backend> {
        match self {
            Format::Esis => Box::new(EsisBackend),
            Format::Xml => Box::new(XmlBackend),
            Format::Sgml => Box::new(SgmlBackend),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Esis => "esis",
            Format::Xml => "xml",
            Format::Sgml => "sgml",
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "esis" => Ok(Format::Esis),
            "xml" => Ok(Format::Xml),
            "sgml" => Ok(Format::Sgml),
            other => Err(format!(
                "unknown output format {other:?} (expected esis, xml or sgml)"
            )),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ESIS text, readable again by the [`Reader`](crate::reader::Reader).
///
/// Attribute values and data use the reader's escapes, so the output
/// decodes to exactly the bytes written. Attributes keep their declared
/// value; implied ones are written in the two-field form.
#[derive(Debug, Clone, Copy, Default)]
pub struct EsisBackend;

impl EsisBackend {
    fn line(out: &mut dyn Write, tag: u8, body: &[u8]) -> io::Result<()> {
        out.write_all(&[tag])?;
        out.write_all(body)?;
        out.write_all(b"\n")
    }
}

impl Backend for EsisBackend {
    fn emit_tag(
        &mut self,
        out: &mut dyn Write,
        kind: TagKind,
        _options: Options,
        name: &[u8],
        attrs: &mut [Attribute<'_>],
    ) -> io::Result<()> {
        if kind != TagKind::End {
            for attr in attrs.iter() {
                out.write_all(b"A")?;
                out.write_all(attr.name)?;
                out.write_all(b" ")?;
                out.write_all(attr.declared.keyword().as_bytes())?;
                if !attr.is_implied() {
                    out.write_all(b" ")?;
                    out.write_all(&escape::encode(attr.value))?;
                }
                out.write_all(b"\n")?;
            }
            Self::line(out, b'(', name)?;
        }
        if kind != TagKind::Start {
            Self::line(out, b')', name)?;
        }
        Ok(())
    }

    fn emit_data(
        &mut self,
        out: &mut dyn Write,
        _kind: DataKind,
        _options: Options,
        data: &[u8],
    ) -> io::Result<()> {
        Self::line(out, b'-', &escape::encode(data))
    }

    fn emit_pi(&mut self, out: &mut dyn Write, _options: Options, text: &[u8]) -> io::Result<()> {
        // A newline would end the line early.
        Self::line(out, b'?', &escape::encode(text))
    }
}

/// Open tag shared by XML and SGML. Implied attributes have no value and
/// are left out.
fn open_tag(
    out: &mut dyn Write,
    name: &[u8],
    attrs: &[Attribute<'_>],
    values: Markup,
) -> io::Result<()> {
    out.write_all(b"<")?;
    out.write_all(name)?;
    for attr in attrs.iter().filter(|a| !a.is_implied()) {
        out.write_all(b" ")?;
        escape::write_markup(out, attr.name, values)?;
        out.write_all(b"=\"")?;
        escape::write_markup(out, attr.value, values)?;
        out.write_all(b"\"")?;
    }
    Ok(())
}

fn close_tag(out: &mut dyn Write, name: &[u8]) -> io::Result<()> {
    out.write_all(b"</")?;
    out.write_all(name)?;
    out.write_all(b">")
}

fn markup_data(out: &mut dyn Write, kind: DataKind, data: &[u8]) -> io::Result<()> {
    match kind {
        DataKind::Escaped => escape::write_markup(out, data, Markup::Text),
        DataKind::Raw => escape::write_markup(out, data, Markup::Controls),
    }
}

/// XML 1.0 output, optionally canonical.
///
/// With [`Options::CANONICAL`] attributes are sorted by name (byte
/// order, stable) and newlines in attribute values become `&#10;`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlBackend;

impl Backend for XmlBackend {
    fn emit_tag(
        &mut self,
        out: &mut dyn Write,
        kind: TagKind,
        options: Options,
        name: &[u8],
        attrs: &mut [Attribute<'_>],
    ) -> io::Result<()> {
        if kind == TagKind::End {
            return close_tag(out, name);
        }
        let values = if options.is_canonical() {
            attrs.sort_by(|a, b| a.name.cmp(b.name));
            Markup::TextNewlines
        } else {
            Markup::Text
        };
        open_tag(out, name, attrs, values)?;
        if kind == TagKind::Empty {
            out.write_all(b"/>")
        } else {
            out.write_all(b">")
        }
    }

    fn emit_data(
        &mut self,
        out: &mut dyn Write,
        kind: DataKind,
        _options: Options,
        data: &[u8],
    ) -> io::Result<()> {
        markup_data(out, kind, data)
    }

    fn emit_pi(&mut self, out: &mut dyn Write, _options: Options, text: &[u8]) -> io::Result<()> {
        out.write_all(b"<?")?;
        out.write_all(text)?;
        out.write_all(b"?>")
    }
}

/// SGML output: XML without self-closing tags or canonical form.
#[derive(Debug, Clone, Copy, Default)]
pub struct SgmlBackend;

impl Backend for SgmlBackend {
    fn emit_tag(
        &mut self,
        out: &mut dyn Write,
        kind: TagKind,
        _options: Options,
        name: &[u8],
        attrs: &mut [Attribute<'_>],
    ) -> io::Result<()> {
        match kind {
            TagKind::End => close_tag(out, name),
            TagKind::Start | TagKind::Empty => {
                open_tag(out, name, attrs, Markup::Text)?;
                out.write_all(b">")
            }
        }
    }

    fn emit_data(
        &mut self,
        out: &mut dyn Write,
        kind: DataKind,
        _options: Options,
        data: &[u8],
    ) -> io::Result<()> {
        markup_data(out, kind, data)
    }

    fn emit_pi(&mut self, out: &mut dyn Write, _options: Options, text: &[u8]) -> io::Result<()> {
        out.write_all(b"<?")?;
        out.write_all(text)?;
        out.write_all(b">")
    }
}
