//! Growable byte arena with mark/release checkpoints.
//!
//! The reader stages attribute names, values and element names here; the
//! writer stages attributes the same way. Everything handed out is an
//! offset ([`Ref`], [`ArenaSlice`]), never an address, so reallocation on
//! growth cannot leave a dangling reference. Bytes are resolved with
//! [`Arena::slice`] at the point of use.
//!
//! # Cursors
//!
//! ```text
//! 0                top          mark               capacity
//! ├── committed ───┤── reserved ──┤──── free ────────┤
//! ```
//!
//! `top <= mark <= capacity` holds after every operation.

use crate::config::ArenaConfig;
use crate::error::{Error, Result};

/// Offset into an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ref(usize);

impl Ref {
    /// The start of the arena; releasing to it empties the arena.
    pub const ZERO: Ref = Ref(0);

    #[inline]
    pub fn offset(self) -> usize {
        self.0
    }
}

/// A byte range inside an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaSlice {
    /// Start offset
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl ArenaSlice {
    /// Create a new arena slice.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the slice in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the slice is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Growable byte buffer with checkpoint (`mark`) and rollback (`release`).
#[derive(Debug)]
pub struct Arena {
    /// Backing store; its length is the capacity.
    buf: Vec<u8>,
    top: usize,
    mark: usize,
    config: ArenaConfig,
}

impl Arena {
    /// Create an arena with the default chunk size and no limit.
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    /// Create an arena with one chunk of initial capacity (capped at the limit).
    pub fn with_config(config: ArenaConfig) -> Self {
        let chunk = config.chunk.max(1);
        let initial = config.limit.map_or(chunk, |limit| chunk.min(limit));
        Self {
            buf: vec![0; initial],
            top: 0,
            mark: 0,
            config: ArenaConfig { chunk, ..config },
        }
    }

    /// Current capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// End of the committed bytes.
    #[inline]
    pub fn top(&self) -> Ref {
        Ref(self.top)
    }

    /// End of the reserved bytes.
    #[inline]
    pub fn mark_position(&self) -> Ref {
        Ref(self.mark)
    }

    /// Check if nothing is committed or reserved.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mark == 0
    }

    /// Grow so that `min_extra` more bytes fit after the mark.
    ///
    /// Capacity is rounded up to a whole number of chunks. Fails with
    /// `NoMemory` when the allocator refuses or the limit is in the way.
    pub fn grow(&mut self, min_extra: usize) -> Result<()> {
        let needed = self
            .mark
            .checked_add(min_extra)
            .ok_or(Error::NoMemory { requested: min_extra })?;
        self.reserve_to(needed)
    }

    fn reserve_to(&mut self, needed: usize) -> Result<()> {
        let capacity = self.buf.len();
        if needed <= capacity {
            return Ok(());
        }
        let requested = needed - capacity;
        let oom = Error::NoMemory { requested };

        let chunk = self.config.chunk;
        let mut new_capacity = needed
            .checked_add(chunk - 1)
            .map(|n| n / chunk * chunk)
            .ok_or(oom.clone())?;
        if let Some(limit) = self.config.limit {
            if needed > limit {
                log::debug!(
                    target: "esis.arena",
                    "growth to {needed} bytes refused by limit {limit}"
                );
                return Err(oom);
            }
            new_capacity = new_capacity.min(limit);
        }

        self.buf
            .try_reserve_exact(new_capacity - capacity)
            .map_err(|_| oom)?;
        self.buf.resize(new_capacity, 0);
        log::debug!(target: "esis.arena", "grew arena {capacity} -> {new_capacity} bytes");
        Ok(())
    }

    /// Reserve `n` bytes past the mark and return a ref to their start.
    ///
    /// `top` moves to the old mark, so `mark(0)` is a plain checkpoint.
    pub fn mark(&mut self, n: usize) -> Result<Ref> {
        self.grow(n)?;
        self.top = self.mark;
        self.mark += n;
        Ok(Ref(self.top))
    }

    /// Discard everything committed or reserved after `r`.
    pub fn release(&mut self, r: Ref) -> Ref {
        let r = r.0.min(self.mark);
        self.mark = r;
        self.top = self.top.min(r);
        Ref(r)
    }

    /// Append bytes at `top`, returning the new top.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Ref> {
        self.push_slice(bytes).map(|s| Ref(s.end))
    }

    /// Append bytes at `top`, returning where they landed.
    pub fn push_slice(&mut self, bytes: &[u8]) -> Result<ArenaSlice> {
        let start = self.top;
        let end = start
            .checked_add(bytes.len())
            .ok_or(Error::NoMemory { requested: bytes.len() })?;
        self.reserve_to(end)?;
        self.buf[start..end].copy_from_slice(bytes);
        self.top = end;
        self.mark = self.mark.max(end);
        Ok(ArenaSlice::new(start, end))
    }

    /// Remove the last `n` committed bytes and return them.
    ///
    /// Anything reserved above the old top is released as well.
    pub fn pop(&mut self, n: usize) -> Result<&[u8]> {
        if n > self.top {
            return Err(Error::Internal("arena pop below zero"));
        }
        let end = self.top;
        self.top -= n;
        self.mark = self.top;
        Ok(&self.buf[self.top..end])
    }

    /// Resolve a slice to its bytes.
    ///
    /// Slices beyond the mark resolve to an empty slice.
    #[inline]
    pub fn slice(&self, slice: ArenaSlice) -> &[u8] {
        if slice.start > slice.end || slice.end > self.mark {
            return &[];
        }
        &self.buf[slice.start..slice.end]
    }

    /// Mutable access to committed or reserved bytes (to fill a `mark`).
    #[inline]
    pub fn slice_mut(&mut self, slice: ArenaSlice) -> &mut [u8] {
        if slice.start > slice.end || slice.end > self.mark {
            return &mut [];
        }
        &mut self.buf[slice.start..slice.end]
    }

    /// Drop all contents, keeping capacity.
    pub fn clear(&mut self) {
        self.release(Ref::ZERO);
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
