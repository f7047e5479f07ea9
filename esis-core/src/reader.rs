//! ESIS reader: line decoder, frame stack and handler dispatch.
//!
//! Each input line is one instruction, selected by its first byte:
//!
//! ```text
//! A<name> <marker> <value>   attribute of the next start tag
//! A<name> IMPLIED            attribute without a value
//! (<name>                    start tag
//! -<escaped data>            character data
//! )<name>                    end tag
//! ?<text>                    processing instruction (pass-through only)
//! ```
//!
//! There is no nested grammar. Nesting lives in a stack of frames, one per
//! open element; a frame is pushed on the first attribute (or the start
//! tag) and popped on the end tag by stack discipline alone. Names, values
//! and raw attribute lines of open frames are kept in the arena and
//! released with the frame.
//!
//! # Modes
//!
//! The same state machine runs in two modes. In parse mode events without
//! a handler are dropped. In filter mode ([`Reader::filter`]) they are
//! copied, byte for byte, to an echo sink. Lines that sit between an
//! element's attributes and its start tag are held with the attributes,
//! so the echo keeps input order.
//!
//! # Errors
//!
//! Malformed lines record a sticky `Syntax` error (first one wins), are
//! skipped, and decoding carries on. Memory and I/O failures abort the
//! pass; later passes return the stored error without doing anything.

use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;

use crate::arena::{Arena, ArenaSlice};
use crate::config::ReaderConfig;
use crate::error::{Error, Result, Sticky, SyntaxCode};
use crate::escape;
use crate::event::{AttrSlot, Attribute, DeclaredValue, Element, ElementEvent, Env, Frame};
use crate::registry::{ElementHandler, Registry, Resolved, Target};

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub lines: usize,
    pub attributes: usize,
    pub starts: usize,
    pub data: usize,
    pub ends: usize,
    pub processing_instructions: usize,
    /// Lines of a kind the reader does not interpret (including empty lines)
    pub unsupported: usize,
    /// Events delivered to a handler
    pub dispatched: usize,
    /// Lines copied to the echo sink
    pub echoed: usize,
    /// Events with neither handler nor echo sink
    pub dropped: usize,
    pub syntax_errors: usize,
}

/// Optional pass-through output.
struct Sink<'e> {
    out: Option<&'e mut dyn Write>,
}

impl<'e> Sink<'e> {
    fn none() -> Self {
        Self { out: None }
    }

    fn to(out: &'e mut dyn Write) -> Self {
        Self { out: Some(out) }
    }

    #[inline]
    fn is_attached(&self) -> bool {
        self.out.is_some()
    }

    /// Write `line` plus newline; false when no sink is attached.
    fn line(&mut self, line: &[u8]) -> io::Result<bool> {
        match self.out.as_deref_mut() {
            Some(out) => {
                out.write_all(line)?;
                out.write_all(b"\n")?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.out.as_deref_mut() {
            Some(out) => out.flush(),
            None => Ok(()),
        }
    }
}

/// Decodes ESIS and dispatches element events to registered handlers.
///
/// `U` is the context type handed to every handler, usually a
/// [`Writer`](crate::writer::Writer) or some state of the caller's.
///
/// Input may arrive in pieces of any size through
/// [`parse_chunk`](Self::parse_chunk); a line cut by a chunk boundary is
/// held back until its end arrives.
///
/// ```
/// use std::ops::ControlFlow;
/// use esis_core::{ElementEvent, Reader};
///
/// let mut names = Vec::new();
/// let mut reader: Reader<'_, Vec<String>> = Reader::new();
/// reader
///     .register_fn("", 0, |names: &mut Vec<String>, event: ElementEvent<'_>, _env| {
///         if let ElementEvent::Start { element, .. } = event {
///             names.push(String::from_utf8_lossy(element.name).into_owned());
///         }
///         ControlFlow::Continue(())
///     })
///     .unwrap();
/// reader.parse_chunk(b"(doc\n(p\n)", false, &mut names).unwrap();
/// reader.parse_chunk(b"p\n)doc\n", true, &mut names).unwrap();
/// assert_eq!(names, ["doc", "p"]);
/// ```
pub struct Reader<'h, U: ?Sized = ()> {
    config: ReaderConfig,
    arena: Arena,
    frames: Vec<Frame>,
    attrs: Vec<AttrSlot>,
    registry: Registry<'h, U>,
    /// Attributes staged for the element whose start tag is pending
    n_att: usize,
    /// Decoded character data of the current line
    scratch: Vec<u8>,
    /// Unterminated tail of the last chunk
    partial: Vec<u8>,
    /// A document is being fed and its final chunk has not come yet
    in_pass: bool,
    /// A handler stopped the current document
    halted: bool,
    line_no: usize,
    error: Sticky,
    stats: Stats,
}

impl<'h, U: ?Sized> Reader<'h, U> {
    pub fn new() -> Self {
        Self::with_config(ReaderConfig::default())
    }

    pub fn with_config(config: ReaderConfig) -> Self {
        Self {
            arena: Arena::with_config(config.arena),
            config,
            frames: Vec::new(),
            attrs: Vec::new(),
            registry: Registry::new(),
            n_att: 0,
            scratch: Vec::new(),
            partial: Vec::new(),
            in_pass: false,
            halted: false,
            line_no: 0,
            error: Sticky::default(),
            stats: Stats::default(),
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Register a handler for element `name`; the empty name is the wildcard.
    pub fn register<H>(&mut self, name: impl AsRef<[u8]>, id: i64, handler: H) -> Result<()>
    where
        H: ElementHandler<U> + 'h,
    {
        let name = name.as_ref();
        log::trace!(
            target: "esis.reader",
            "register {:?} as {id}",
            String::from_utf8_lossy(name)
        );
        self.registry
            .register(name, id, handler)
            .map_err(|e| self.fail(e))
    }

    /// Register a closure; same as [`register`](Self::register) but lets the
    /// compiler infer the closure's argument types.
    pub fn register_fn<F>(&mut self, name: impl AsRef<[u8]>, id: i64, f: F) -> Result<()>
    where
        F: FnMut(&mut U, ElementEvent<'_>, Env<'_>) -> ControlFlow<()> + 'h,
    {
        self.register(name, id, f)
    }

    /// Register the handler for every element without its own registration.
    pub fn register_wildcard<H>(&mut self, id: i64, handler: H) -> Result<()>
    where
        H: ElementHandler<U> + 'h,
    {
        self.register(b"", id, handler)
    }

    /// The first error of this reader, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.get()
    }

    /// Counters of the current or last document.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Number of currently open (started) elements.
    pub fn depth(&self) -> usize {
        self.frames.iter().filter(|f| f.started).count()
    }

    /// Lines read since construction or the last reset.
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    /// Forget open elements, staged attributes, held-back input and the
    /// sticky error. Registrations are kept.
    pub fn reset(&mut self) {
        self.arena.clear();
        self.frames.clear();
        self.attrs.clear();
        self.n_att = 0;
        self.partial.clear();
        self.in_pass = false;
        self.halted = false;
        self.line_no = 0;
        self.error.clear();
        self.stats = Stats::default();
    }

    /// Decode a whole document from a byte slice, dropping unhandled
    /// events. A last line without newline is decoded too.
    pub fn parse_bytes(&mut self, input: &[u8], cx: &mut U) -> Result<Stats> {
        self.parse_chunk(input, true, cx)
    }

    /// Decode a whole document from a byte slice, echoing unhandled events.
    pub fn filter_bytes(
        &mut self,
        input: &[u8],
        echo: &mut dyn Write,
        cx: &mut U,
    ) -> Result<Stats> {
        self.filter_chunk(input, true, echo, cx)
    }

    /// Decode the next piece of a document. Pass `is_final` with the last
    /// piece (which may be empty) to decode an unterminated last line.
    ///
    /// The returned counters cover the document so far.
    pub fn parse_chunk(&mut self, chunk: &[u8], is_final: bool, cx: &mut U) -> Result<Stats> {
        self.run_chunk(chunk, is_final, Sink::none(), cx)
    }

    /// [`parse_chunk`](Self::parse_chunk), echoing unhandled events.
    pub fn filter_chunk(
        &mut self,
        chunk: &[u8],
        is_final: bool,
        echo: &mut dyn Write,
        cx: &mut U,
    ) -> Result<Stats> {
        self.run_chunk(chunk, is_final, Sink::to(echo), cx)
    }

    /// Decode a whole stream, dropping unhandled events.
    pub fn parse<R: BufRead>(&mut self, input: R, cx: &mut U) -> Result<Stats> {
        self.run_stream(input, Sink::none(), cx)
    }

    /// Decode a whole stream, echoing unhandled events to `echo`.
    pub fn filter<R: BufRead, W: Write>(
        &mut self,
        input: R,
        echo: &mut W,
        cx: &mut U,
    ) -> Result<Stats> {
        self.run_stream(input, Sink::to(echo), cx)
    }

    fn begin_pass(&mut self) -> Result<()> {
        if let Some(err) = self.error.fatal() {
            log::debug!(target: "esis.reader", "pass skipped after earlier failure: {err}");
            return Err(err.clone());
        }
        if !self.in_pass {
            self.stats = Stats::default();
            self.in_pass = true;
        }
        Ok(())
    }

    fn end_pass(&mut self, is_final: bool, sink: &mut Sink<'_>) -> Result<Stats> {
        if is_final {
            if !self.halted {
                self.release_held_lines(sink)?;
            }
            self.partial.clear();
            self.in_pass = false;
            self.halted = false;
            log::debug!(target: "esis.reader", "pass done: {:?}", self.stats);
        }
        sink.flush().map_err(|e| self.fail(Error::write(e)))?;
        Ok(self.stats)
    }

    fn halt_on(&mut self, flow: ControlFlow<()>) {
        if flow.is_break() {
            log::debug!(
                target: "esis.reader",
                "handler stopped the pass at line {}",
                self.line_no
            );
            self.halted = true;
            self.partial.clear();
        }
    }

    fn run_chunk(
        &mut self,
        chunk: &[u8],
        is_final: bool,
        mut sink: Sink<'_>,
        cx: &mut U,
    ) -> Result<Stats> {
        self.begin_pass()?;
        if !self.halted {
            let flow = self.feed(chunk, is_final, &mut sink, cx)?;
            self.halt_on(flow);
        }
        self.end_pass(is_final, &mut sink)
    }

    fn run_stream<R: BufRead>(
        &mut self,
        mut input: R,
        mut sink: Sink<'_>,
        cx: &mut U,
    ) -> Result<Stats> {
        self.begin_pass()?;
        while !self.halted {
            let chunk = match input.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.fail(Error::read(e))),
            };
            if chunk.is_empty() {
                break;
            }
            let n = chunk.len();
            let flow = self.feed(chunk, false, &mut sink, cx)?;
            input.consume(n);
            self.halt_on(flow);
        }
        if !self.halted {
            let flow = self.feed(&[], true, &mut sink, cx)?;
            self.halt_on(flow);
        }
        self.end_pass(true, &mut sink)
    }

    /// Split a chunk into lines, joining the held-back tail of the last
    /// chunk with the first line of this one.
    fn feed(
        &mut self,
        chunk: &[u8],
        is_final: bool,
        sink: &mut Sink<'_>,
        cx: &mut U,
    ) -> Result<ControlFlow<()>> {
        let mut rest = chunk;
        if !self.partial.is_empty() {
            let (head, tail, complete) = match memchr::memchr(b'\n', rest) {
                Some(i) => (&rest[..i], &rest[i + 1..], true),
                None => (rest, &rest[rest.len()..], is_final),
            };
            self.partial.extend_from_slice(head);
            rest = tail;
            if !complete {
                return Ok(ControlFlow::Continue(()));
            }
            let mut joined = std::mem::take(&mut self.partial);
            let flow = self.line(&joined, sink, cx);
            joined.clear();
            self.partial = joined;
            if flow?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }

        while let Some(i) = memchr::memchr(b'\n', rest) {
            let line = &rest[..i];
            rest = &rest[i + 1..];
            if self.line(line, sink, cx)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        if rest.is_empty() {
            Ok(ControlFlow::Continue(()))
        } else if is_final {
            self.line(rest, sink, cx)
        } else {
            self.partial.extend_from_slice(rest);
            Ok(ControlFlow::Continue(()))
        }
    }

    /// Record a fatal error and hand it back for returning.
    fn fail(&mut self, err: Error) -> Error {
        log::error!(target: "esis.reader", "line {}: {err}", self.line_no);
        self.error.set(err.clone());
        err
    }

    /// Record a recoverable error; the line is skipped.
    fn syntax(&mut self, code: SyntaxCode) {
        log::warn!(target: "esis.reader", "line {}: {code}, line skipped", self.line_no);
        self.stats.syntax_errors += 1;
        self.error.set(Error::Syntax { line: self.line_no, code });
    }

    fn echo(&mut self, sink: &mut Sink<'_>, line: &[u8]) -> Result<()> {
        match sink.line(line) {
            Ok(true) => {
                self.stats.echoed += 1;
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => Err(self.fail(Error::write(e))),
        }
    }

    /// Echo a line that does not belong to the pending element. While
    /// attributes are pending it is held with them, so it comes out in
    /// input order whether or not their element gets echoed.
    fn echo_in_order(&mut self, sink: &mut Sink<'_>, line: &[u8]) -> Result<()> {
        if self.n_att == 0 || !sink.is_attached() {
            return self.echo(sink, line);
        }
        let raw = self.stage(line)?;
        self.attrs.push(AttrSlot {
            name: ArenaSlice::default(),
            value: ArenaSlice::default(),
            declared: None,
            raw,
        });
        if let Some(frame) = self.frames.last_mut() {
            frame.attr_count += 1;
        }
        Ok(())
    }

    /// Echo the held lines of the top frame: every line when `all`,
    /// otherwise only the non-attribute ones.
    fn replay(&mut self, sink: &mut Sink<'_>, all: bool) -> Result<()> {
        let Some(frame) = self.frames.last().copied() else {
            return Ok(());
        };
        for k in frame.attr_start..frame.attr_start + frame.attr_count {
            let slot = self.attrs[k];
            if !all && slot.declared.is_some() {
                continue;
            }
            match sink.line(self.arena.slice(slot.raw)) {
                Ok(true) => self.stats.echoed += 1,
                Ok(false) => {}
                Err(e) => return Err(self.fail(Error::write(e))),
            }
        }
        Ok(())
    }

    /// Lines held with attributes that never got their start tag.
    fn release_held_lines(&mut self, sink: &mut Sink<'_>) -> Result<()> {
        if self.n_att > 0 {
            self.replay(sink, false)?;
        }
        Ok(())
    }

    fn stage(&mut self, bytes: &[u8]) -> Result<ArenaSlice> {
        self.arena.push_slice(bytes).map_err(|e| self.fail(e))
    }

    fn line(&mut self, line: &[u8], sink: &mut Sink<'_>, cx: &mut U) -> Result<ControlFlow<()>> {
        self.line_no += 1;
        self.stats.lines += 1;
        log::trace!(
            target: "esis.reader",
            "{:>5}: {}",
            self.line_no,
            String::from_utf8_lossy(line)
        );

        let Some((&tag, body)) = line.split_first() else {
            return self.unsupported(line, sink);
        };
        match tag {
            b'?' => self.processing_instruction(line, sink),
            b'A' => self.attribute(line, body),
            b'(' => self.start(line, body, sink, cx),
            b'-' => self.data(line, body, sink, cx),
            b')' => self.end(line, body, sink, cx),
            _ => self.unsupported(line, sink),
        }
    }

    fn processing_instruction(
        &mut self,
        line: &[u8],
        sink: &mut Sink<'_>,
    ) -> Result<ControlFlow<()>> {
        self.stats.processing_instructions += 1;
        if self.config.echo_processing_instructions {
            self.echo_in_order(sink, line)?;
        }
        Ok(ControlFlow::Continue(()))
    }

    fn unsupported(&mut self, line: &[u8], sink: &mut Sink<'_>) -> Result<ControlFlow<()>> {
        self.stats.unsupported += 1;
        log::debug!(
            target: "esis.reader",
            "line {}: unsupported line kind {:?}",
            self.line_no,
            line.first().map(|&b| b as char)
        );
        if self.config.echo_unsupported {
            self.echo_in_order(sink, line)?;
        }
        Ok(ControlFlow::Continue(()))
    }

    fn push_frame(&mut self) -> Result<()> {
        let base = self.arena.mark(0).map_err(|e| self.fail(e))?;
        self.frames.push(Frame {
            base,
            name: ArenaSlice::default(),
            attr_start: self.attrs.len(),
            attr_count: 0,
            target: Target::Drop,
            started: false,
        });
        Ok(())
    }

    /// Drop the top frame and everything it staged.
    fn pop_frame(&mut self) -> Option<Frame> {
        let frame = self.frames.pop()?;
        self.attrs.truncate(frame.attr_start);
        self.arena.release(frame.base);
        Some(frame)
    }

    fn attribute(&mut self, line: &[u8], body: &[u8]) -> Result<ControlFlow<()>> {
        let Some(sp) = memchr::memchr(b' ', body) else {
            self.syntax(SyntaxCode::MissingNameSeparator);
            return Ok(ControlFlow::Continue(()));
        };
        let name = &body[..sp];
        let rest = &body[sp + 1..];
        if name.is_empty() {
            self.syntax(SyntaxCode::EmptyName);
            return Ok(ControlFlow::Continue(()));
        }

        let (marker, value) = match memchr::memchr(b' ', rest) {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };
        let Some(declared) = DeclaredValue::from_keyword(marker) else {
            self.syntax(SyntaxCode::UnknownMarker);
            return Ok(ControlFlow::Continue(()));
        };
        let value = match (declared, value) {
            (DeclaredValue::Implied, _) => &b""[..],
            (_, Some(value)) => value,
            (_, None) => {
                self.syntax(SyntaxCode::MissingValueSeparator);
                return Ok(ControlFlow::Continue(()));
            }
        };

        if self.n_att == 0 {
            self.push_frame()?;
        }
        let name = self.stage(name)?;
        let value = self.stage(&escape::decode(value))?;
        let raw = self.stage(line)?;
        self.attrs.push(AttrSlot { name, value, declared: Some(declared), raw });
        if let Some(frame) = self.frames.last_mut() {
            frame.attr_count += 1;
        }
        self.n_att += 1;
        self.stats.attributes += 1;
        Ok(ControlFlow::Continue(()))
    }

    fn resolve(&mut self, name: &[u8], echo: bool) -> Target {
        match self.registry.resolve(name) {
            Some(resolved) => Target::Handler(resolved),
            None if echo => Target::Echo,
            None => Target::Drop,
        }
    }

    fn start(
        &mut self,
        line: &[u8],
        name: &[u8],
        sink: &mut Sink<'_>,
        cx: &mut U,
    ) -> Result<ControlFlow<()>> {
        if name.is_empty() {
            self.syntax(SyntaxCode::EmptyName);
            return Ok(ControlFlow::Continue(()));
        }
        if self.n_att == 0 {
            self.push_frame()?;
        }
        let slot = self.stage(name)?;
        let target = self.resolve(name, sink.is_attached());
        let idx = self.frames.len() - 1;
        let frame = {
            let frame = &mut self.frames[idx];
            frame.name = slot;
            frame.target = target;
            frame.started = true;
            *frame
        };
        self.n_att = 0;
        self.stats.starts += 1;

        match target {
            Target::Handler(resolved) => {
                self.replay(sink, false)?;
                Ok(self.dispatch_start(resolved, idx, frame, cx))
            }
            Target::Echo => {
                self.replay(sink, true)?;
                self.echo(sink, line)?;
                Ok(ControlFlow::Continue(()))
            }
            Target::Drop => {
                self.stats.dropped += 1;
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    fn dispatch_start(
        &mut self,
        resolved: Resolved,
        idx: usize,
        frame: Frame,
        cx: &mut U,
    ) -> ControlFlow<()> {
        let arena = &self.arena;
        let attrs: Vec<Attribute<'_>> = self.attrs
            [frame.attr_start..frame.attr_start + frame.attr_count]
            .iter()
            .filter_map(|slot| slot.attribute(arena))
            .collect();
        let element = Element::new(arena.slice(frame.name), &attrs);
        let env = Env { arena, frames: &self.frames[..idx], attrs: &self.attrs };
        let flow = self
            .registry
            .handler_mut(resolved.handler)
            .handle(cx, ElementEvent::Start { id: resolved.id, element }, env);
        self.stats.dispatched += 1;
        flow
    }

    fn data(
        &mut self,
        line: &[u8],
        body: &[u8],
        sink: &mut Sink<'_>,
        cx: &mut U,
    ) -> Result<ControlFlow<()>> {
        self.stats.data += 1;
        let owner = self.frames.iter().rposition(|f| f.started);
        let target = owner.map_or(Target::Drop, |idx| self.frames[idx].target);

        match (owner, target) {
            (Some(idx), Target::Handler(resolved)) => {
                self.scratch.clear();
                escape::decode_into(body, &mut self.scratch);
                if self.scratch.is_empty() {
                    return Ok(ControlFlow::Continue(()));
                }
                let env = Env {
                    arena: &self.arena,
                    frames: &self.frames[..idx],
                    attrs: &self.attrs,
                };
                let flow = self.registry.handler_mut(resolved.handler).handle(
                    cx,
                    ElementEvent::CharacterData { id: resolved.id, data: &self.scratch },
                    env,
                );
                self.stats.dispatched += 1;
                Ok(flow)
            }
            // Data outside any element goes where unhandled data goes.
            (None, _) | (Some(_), Target::Echo) if sink.is_attached() => {
                self.echo_in_order(sink, line)?;
                Ok(ControlFlow::Continue(()))
            }
            _ => {
                self.stats.dropped += 1;
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    fn end(
        &mut self,
        line: &[u8],
        name: &[u8],
        sink: &mut Sink<'_>,
        cx: &mut U,
    ) -> Result<ControlFlow<()>> {
        self.stats.ends += 1;
        if name.is_empty() {
            self.syntax(SyntaxCode::EmptyName);
            return Ok(ControlFlow::Continue(()));
        }
        if self.n_att > 0 {
            self.syntax(SyntaxCode::DanglingAttributes);
            self.replay(sink, false)?;
            self.pop_frame();
            self.n_att = 0;
        }
        let Some(&frame) = self.frames.last() else {
            self.syntax(SyntaxCode::UnbalancedEnd);
            return Ok(ControlFlow::Continue(()));
        };
        if self.config.check_end_tags && self.arena.slice(frame.name) != name {
            self.syntax(SyntaxCode::EndTagMismatch);
        }

        let flow = match frame.target {
            Target::Handler(resolved) => {
                let idx = self.frames.len() - 1;
                let element = Element::new(self.arena.slice(frame.name), &[]);
                let env = Env {
                    arena: &self.arena,
                    frames: &self.frames[..idx],
                    attrs: &self.attrs,
                };
                let flow = self
                    .registry
                    .handler_mut(resolved.handler)
                    .handle(cx, ElementEvent::End { id: resolved.id, element }, env);
                self.stats.dispatched += 1;
                flow
            }
            Target::Echo => {
                self.echo(sink, line)?;
                ControlFlow::Continue(())
            }
            Target::Drop => {
                self.stats.dropped += 1;
                ControlFlow::Continue(())
            }
        };
        self.pop_frame();
        Ok(flow)
    }
}

impl<U: ?Sized> Default for Reader<'_, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: ?Sized> std::fmt::Debug for Reader<'_, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("frames", &self.frames.len())
            .field("line_no", &self.line_no)
            .field("error", &self.error.get())
            .finish()
    }
}
