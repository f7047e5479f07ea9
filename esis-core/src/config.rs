//! Reader, arena and writer settings.

/// Default arena growth step in bytes.
pub const ARENA_CHUNK: usize = 2048;

/// Sizing of an [`Arena`](crate::arena::Arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Capacity grows in multiples of this many bytes.
    pub chunk: usize,
    /// Upper bound on capacity; growth past it fails with `NoMemory`.
    pub limit: Option<usize>,
}

impl ArenaConfig {
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk.max(1);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            chunk: ARENA_CHUNK,
            limit: None,
        }
    }
}

/// Behaviour switches for a [`Reader`](crate::reader::Reader).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    pub arena: ArenaConfig,
    /// Compare `)` names against the open element and record
    /// `EndTagMismatch` when they differ.
    pub check_end_tags: bool,
    /// Copy `?` lines to the echo sink in filter mode.
    pub echo_processing_instructions: bool,
    /// Copy line kinds the reader does not interpret to the echo sink.
    pub echo_unsupported: bool,
}

impl ReaderConfig {
    pub fn with_arena(mut self, arena: ArenaConfig) -> Self {
        self.arena = arena;
        self
    }

    pub fn with_check_end_tags(mut self, check: bool) -> Self {
        self.check_end_tags = check;
        self
    }

    pub fn with_echo_processing_instructions(mut self, echo: bool) -> Self {
        self.echo_processing_instructions = echo;
        self
    }

    pub fn with_echo_unsupported(mut self, echo: bool) -> Self {
        self.echo_unsupported = echo;
        self
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            check_end_tags: false,
            echo_processing_instructions: true,
            echo_unsupported: true,
        }
    }
}

bitflags::bitflags! {
    /// Writer options handed to the back end with every tag and data event.
    ///
    /// Only `CANONICAL` has a fixed meaning. Other bits are kept as given
    /// (`from_bits_retain`) for back ends that want their own variants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Options: u32 {
        /// Canonical XML: sorted attributes, `&#10;` for newlines in values.
        const CANONICAL = 0o10000;
    }
}

impl Options {
    /// Check if canonical output is requested.
    #[inline]
    pub fn is_canonical(self) -> bool {
        self.contains(Options::CANONICAL)
    }
}
