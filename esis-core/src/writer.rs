//! Writer front end.
//!
//! Mirrors the reader: attributes are staged first (`attr`, `atts`) and
//! shipped with the next start or empty tag, together with any attributes
//! given to that call directly. Staged attributes live in an arena that
//! is emptied after every tag.
//!
//! All methods return `&mut Self` so events chain; failures are kept as a
//! sticky error and surface from [`Writer::flush`], [`Writer::finish`] or
//! [`Writer::error`]. After an I/O failure every further call is a no-op.
//!
//! ```
//! use esis_core::{Attribute, Format, Options, Writer};
//!
//! let mut w = Writer::new(Vec::new(), Format::Xml, Options::empty());
//! w.attr("id", "x1")
//!     .start("para", &[])
//!     .pcdata("Hello")
//!     .end("para");
//! assert_eq!(w.finish().unwrap(), b"<para id=\"x1\">Hello</para>");
//!
//! let mut w = Writer::new(Vec::new(), Format::Esis, Options::empty());
//! w.empty("br", &[Attribute::new(b"class", b"x")]);
//! assert_eq!(w.finish().unwrap(), b"Aclass CDATA x\n(br\n)br\n");
//! ```

use std::io::Write;
use std::ops::ControlFlow;

use unicode_xid::UnicodeXID;

use crate::arena::{Arena, ArenaSlice, Ref};
use crate::backend::{Backend, DataKind, Format, TagKind};
use crate::config::Options;
use crate::error::{Error, Result, Sticky, SyntaxCode};
use crate::event::{Attribute, DeclaredValue, Element, ElementEvent, Env};

/// Check if `name` can be written as an element or attribute name.
///
/// Accepts UTF-8 that starts with an XID_Start character, `_` or `:` and
/// continues with XID_Continue characters or `-` `.` `:` `_`.
pub fn is_name(name: &[u8]) -> bool {
    let Ok(name) = std::str::from_utf8(name) else {
        return false;
    };
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c == ':' || c.is_xid_start() => {}
        _ => return false,
    }
    chars.all(|c| matches!(c, '-' | '.' | ':' | '_') || c.is_xid_continue())
}

/// Encodes element events through a [`Backend`] into `W`.
pub struct Writer<W: Write> {
    out: W,
    backend: Box<dyn Backend>,
    options: Options,
    arena: Arena,
    /// Staged attributes: name and value slices into `arena`
    staged: Vec<(ArenaSlice, ArenaSlice, DeclaredValue)>,
    /// Events accepted so far; numbers writer-side syntax errors
    events: usize,
    error: Sticky,
}

impl<W: Write> Writer<W> {
    pub fn new(out: W, format: Format, options: Options) -> Self {
        Self::with_backend(out, format.backend(), options)
    }

    /// ESIS text output.
    pub fn esis(out: W) -> Self {
        Self::new(out, Format::Esis, Options::empty())
    }

    /// XML output; pass [`Options::CANONICAL`] for canonical XML.
    pub fn xml(out: W, options: Options) -> Self {
        Self::new(out, Format::Xml, options)
    }

    /// SGML output.
    pub fn sgml(out: W) -> Self {
        Self::new(out, Format::Sgml, Options::empty())
    }

    /// Writer with a caller-supplied back end.
    pub fn with_backend(out: W, backend: Box<dyn Backend>, options: Options) -> Self {
        Self {
            out,
            backend,
            options,
            arena: Arena::new(),
            staged: Vec::new(),
            events: 0,
            error: Sticky::default(),
        }
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// The first error of this writer, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.get()
    }

    /// Number of attributes waiting for the next start tag.
    pub fn staged(&self) -> usize {
        self.staged.len()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn stopped(&self) -> bool {
        self.error.fatal().is_some()
    }

    fn fail(&mut self, err: Error) {
        log::error!(target: "esis.writer", "{err}");
        self.error.set(err);
    }

    fn syntax(&mut self, code: SyntaxCode, name: &[u8]) {
        log::warn!(
            target: "esis.writer",
            "event {}: {code} {:?}, skipped",
            self.events + 1,
            String::from_utf8_lossy(name)
        );
        self.error.set(Error::Syntax { line: self.events + 1, code });
    }

    fn clear_staged(&mut self) {
        self.staged.clear();
        self.arena.release(Ref::ZERO);
    }

    /// Stage one `CDATA` attribute for the next start or empty tag.
    pub fn attr(&mut self, name: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> &mut Self {
        self.declared_attr(name, DeclaredValue::Cdata, value)
    }

    /// Stage one attribute with its declared value. The value of an
    /// `Implied` attribute is ignored.
    pub fn declared_attr(
        &mut self,
        name: impl AsRef<[u8]>,
        declared: DeclaredValue,
        value: impl AsRef<[u8]>,
    ) -> &mut Self {
        let name = name.as_ref();
        let value = if declared == DeclaredValue::Implied { &b""[..] } else { value.as_ref() };
        if self.stopped() {
            return self;
        }
        if !is_name(name) {
            self.syntax(SyntaxCode::InvalidName, name);
            return self;
        }
        let staged = self
            .arena
            .push_slice(name)
            .and_then(|n| self.arena.push_slice(value).map(|v| (n, v, declared)));
        match staged {
            Ok(pair) => self.staged.push(pair),
            Err(e) => self.fail(e),
        }
        self
    }

    /// Stage several attributes, in order.
    pub fn atts(&mut self, attrs: &[Attribute<'_>]) -> &mut Self {
        for attr in attrs {
            self.declared_attr(attr.name, attr.declared, attr.value);
        }
        self
    }

    pub fn start(&mut self, name: impl AsRef<[u8]>, attrs: &[Attribute<'_>]) -> &mut Self {
        self.ship_tag(TagKind::Start, name.as_ref(), attrs);
        self
    }

    pub fn start_elem(&mut self, element: &Element<'_>) -> &mut Self {
        self.ship_tag(TagKind::Start, element.name, element.attrs);
        self
    }

    /// Start tag immediately followed by its end tag.
    pub fn empty(&mut self, name: impl AsRef<[u8]>, attrs: &[Attribute<'_>]) -> &mut Self {
        self.ship_tag(TagKind::Empty, name.as_ref(), attrs);
        self
    }

    pub fn empty_elem(&mut self, element: &Element<'_>) -> &mut Self {
        self.ship_tag(TagKind::Empty, element.name, element.attrs);
        self
    }

    pub fn end(&mut self, name: impl AsRef<[u8]>) -> &mut Self {
        self.ship_tag(TagKind::End, name.as_ref(), &[]);
        self
    }

    pub fn end_elem(&mut self, element: &Element<'_>) -> &mut Self {
        self.ship_tag(TagKind::End, element.name, &[]);
        self
    }

    /// Parsed character data; markup characters get escaped.
    pub fn pcdata(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        self.ship_data(DataKind::Escaped, data.as_ref());
        self
    }

    /// Raw character data; only control bytes get escaped.
    pub fn cdata(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        self.ship_data(DataKind::Raw, data.as_ref());
        self
    }

    /// Write one event as the reader reported it.
    pub fn event(&mut self, event: &ElementEvent<'_>) -> &mut Self {
        match event {
            ElementEvent::Start { element, .. } => self.start_elem(element),
            ElementEvent::CharacterData { data, .. } => self.pcdata(*data),
            ElementEvent::End { element, .. } => self.end_elem(element),
        }
    }

    /// Processing instruction.
    pub fn pi(&mut self, text: impl AsRef<[u8]>) -> &mut Self {
        if self.stopped() {
            return self;
        }
        self.events += 1;
        let text = text.as_ref();
        if let Err(e) = self.backend.emit_pi(&mut self.out, self.options, text) {
            self.fail(Error::write(e));
        }
        self
    }

    fn ship_tag(&mut self, kind: TagKind, name: &[u8], direct: &[Attribute<'_>]) {
        if self.stopped() {
            return;
        }
        if !is_name(name) {
            self.syntax(SyntaxCode::InvalidName, name);
            if kind != TagKind::End {
                self.clear_staged();
            }
            return;
        }
        if let Some(bad) = direct.iter().find(|a| !is_name(a.name)) {
            self.syntax(SyntaxCode::InvalidName, bad.name);
            self.clear_staged();
            return;
        }
        self.events += 1;

        let arena = &self.arena;
        let mut attrs: Vec<Attribute<'_>> = if kind == TagKind::End {
            Vec::new()
        } else {
            self.staged
                .iter()
                .map(|&(n, v, d)| Attribute::with_declared(arena.slice(n), arena.slice(v), d))
                .chain(direct.iter().copied())
                .collect()
        };
        log::trace!(
            target: "esis.writer",
            "{kind:?} {} with {} attributes",
            String::from_utf8_lossy(name),
            attrs.len()
        );
        let shipped = self
            .backend
            .emit_tag(&mut self.out, kind, self.options, name, &mut attrs);
        drop(attrs);

        if let Err(e) = shipped {
            self.fail(Error::write(e));
        }
        if kind != TagKind::End {
            self.clear_staged();
        }
    }

    fn ship_data(&mut self, kind: DataKind, data: &[u8]) {
        if self.stopped() || data.is_empty() {
            return;
        }
        self.events += 1;
        let shipped = self.backend.emit_data(&mut self.out, kind, self.options, data);
        if let Err(e) = shipped {
            self.fail(Error::write(e));
        }
    }

    /// Flush the output; reports the sticky error if there is one.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(err) = self.error.fatal() {
            return Err(err.clone());
        }
        if let Err(e) = self.out.flush() {
            self.fail(Error::write(e));
        }
        match self.error.get() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Flush and hand back the output.
    ///
    /// Fails with the sticky error, syntax errors included; use
    /// [`into_inner`](Self::into_inner) to get the output regardless.
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        log::debug!(target: "esis.writer", "finished after {} events", self.events);
        Ok(self.out)
    }

    /// The output, without flushing or error checks.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Element handler that copies every event into the writer it is given.
///
/// ```
/// use esis_core::{writer, Reader, Writer};
///
/// let mut out = Writer::xml(Vec::new(), Default::default());
/// let mut reader: Reader<'_, Writer<Vec<u8>>> = Reader::new();
/// reader.register(b"para", 1, writer::forward).unwrap();
/// reader.parse_bytes(b"Aid CDATA x1\n(para\n-Hello\n)para\n", &mut out).unwrap();
/// assert_eq!(out.finish().unwrap(), b"<para id=\"x1\">Hello</para>");
/// ```
pub fn forward<W: Write>(
    writer: &mut Writer<W>,
    event: ElementEvent<'_>,
    _env: Env<'_>,
) -> ControlFlow<()> {
    writer.event(&event);
    if writer.stopped() {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}

impl<W: Write> std::fmt::Debug for Writer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer")
            .field("options", &self.options)
            .field("staged", &self.staged.len())
            .field("events", &self.events)
            .field("error", &self.error.get())
            .finish()
    }
}
