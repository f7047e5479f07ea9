//! Element events - what the reader hands to handlers and what the writer
//! accepts.
//!
//! Attribute lines are staged by the reader and arrive inside the
//! following start event, so handlers only ever see:
//!
//! ```text
//! Aid CDATA x1      ┐
//! (para             ┴─▶ Start { name: "para", attrs: [id="x1"] }
//! -Hello            ──▶ CharacterData("Hello")
//! )para             ──▶ End { name: "para" }
//! ```
//!
//! All byte slices borrow from the reader's arena and are only valid for
//! the duration of the callback.

use crate::arena::{Arena, ArenaSlice, Ref};
use crate::registry::Target;

/// Declared value of an attribute: the keyword between name and value on
/// an `A` line.
///
/// `Implied` attributes have no value; their line has two fields only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeclaredValue {
    #[default]
    Cdata,
    Token,
    Name,
    Names,
    Nmtoken,
    Nmtokens,
    Number,
    Numbers,
    Nutoken,
    Nutokens,
    Id,
    Idref,
    Idrefs,
    Entity,
    Entities,
    Notation,
    Implied,
}

static DECLARED_VALUES: phf::Map<&'static [u8], DeclaredValue> = phf::phf_map! {
    b"CDATA" => DeclaredValue::Cdata,
    b"TOKEN" => DeclaredValue::Token,
    b"NAME" => DeclaredValue::Name,
    b"NAMES" => DeclaredValue::Names,
    b"NMTOKEN" => DeclaredValue::Nmtoken,
    b"NMTOKENS" => DeclaredValue::Nmtokens,
    b"NUMBER" => DeclaredValue::Number,
    b"NUMBERS" => DeclaredValue::Numbers,
    b"NUTOKEN" => DeclaredValue::Nutoken,
    b"NUTOKENS" => DeclaredValue::Nutokens,
    b"ID" => DeclaredValue::Id,
    b"IDREF" => DeclaredValue::Idref,
    b"IDREFS" => DeclaredValue::Idrefs,
    b"ENTITY" => DeclaredValue::Entity,
    b"ENTITIES" => DeclaredValue::Entities,
    b"NOTATION" => DeclaredValue::Notation,
    b"IMPLIED" => DeclaredValue::Implied,
};

impl DeclaredValue {
    /// Look up a marker keyword (case-sensitive).
    pub fn from_keyword(keyword: &[u8]) -> Option<Self> {
        DECLARED_VALUES.get(keyword).copied()
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Cdata => "CDATA",
            Self::Token => "TOKEN",
            Self::Name => "NAME",
            Self::Names => "NAMES",
            Self::Nmtoken => "NMTOKEN",
            Self::Nmtokens => "NMTOKENS",
            Self::Number => "NUMBER",
            Self::Numbers => "NUMBERS",
            Self::Nutoken => "NUTOKEN",
            Self::Nutokens => "NUTOKENS",
            Self::Id => "ID",
            Self::Idref => "IDREF",
            Self::Idrefs => "IDREFS",
            Self::Entity => "ENTITY",
            Self::Entities => "ENTITIES",
            Self::Notation => "NOTATION",
            Self::Implied => "IMPLIED",
        }
    }
}

impl std::fmt::Display for DeclaredValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One attribute: name, value and declared value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a [u8],
    pub value: &'a [u8],
    pub declared: DeclaredValue,
}

impl<'a> Attribute<'a> {
    /// A `CDATA` attribute.
    #[inline]
    pub fn new(name: &'a [u8], value: &'a [u8]) -> Self {
        Self::with_declared(name, value, DeclaredValue::Cdata)
    }

    #[inline]
    pub fn with_declared(name: &'a [u8], value: &'a [u8], declared: DeclaredValue) -> Self {
        Self { name, value, declared }
    }

    /// An attribute without a value.
    pub fn implied(name: &'a [u8]) -> Self {
        Self::with_declared(name, b"", DeclaredValue::Implied)
    }

    #[inline]
    pub fn is_implied(&self) -> bool {
        self.declared == DeclaredValue::Implied
    }
}

/// Element type name (GI) with its attributes, in staging order.
///
/// `attrs` includes implied attributes; [`attr`](Self::attr) and
/// [`specified`](Self::specified) skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    pub name: &'a [u8],
    pub attrs: &'a [Attribute<'a>],
}

impl<'a> Element<'a> {
    #[inline]
    pub fn new(name: &'a [u8], attrs: &'a [Attribute<'a>]) -> Self {
        Self { name, attrs }
    }

    /// Look up an attribute value by name (first match with a value).
    pub fn attr(&self, name: &[u8]) -> Option<&'a [u8]> {
        self.specified().find(|a| a.name == name).map(|a| a.value)
    }

    /// Attributes that carry a value.
    pub fn specified(&self) -> impl Iterator<Item = &'a Attribute<'a>> + 'a {
        self.attrs.iter().filter(|a| !a.is_implied())
    }

    /// Index into `attrs` of the first attribute declared `ID`.
    pub fn id_index(&self) -> Option<usize> {
        self.attrs.iter().position(|a| a.declared == DeclaredValue::Id)
    }

    /// Value of the `ID` attribute, if there is one.
    pub fn id_value(&self) -> Option<&'a [u8]> {
        self.id_index().map(|i| self.attrs[i].value)
    }
}

/// Kind of an ESIS structural event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Attribute,
    Start,
    CharacterData,
    End,
}

/// Event delivered to an element handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementEvent<'a> {
    /// Start tag with all staged attributes.
    Start { id: i64, element: Element<'a> },
    /// One decoded data line (never empty).
    CharacterData { id: i64, data: &'a [u8] },
    /// End tag; `element.attrs` is empty.
    End { id: i64, element: Element<'a> },
}

impl<'a> ElementEvent<'a> {
    /// The id the handler was registered with.
    pub fn id(&self) -> i64 {
        match self {
            Self::Start { id, .. } | Self::CharacterData { id, .. } | Self::End { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Start { .. } => EventKind::Start,
            Self::CharacterData { .. } => EventKind::CharacterData,
            Self::End { .. } => EventKind::End,
        }
    }

    /// The element name for start and end events.
    pub fn name(&self) -> Option<&'a [u8]> {
        match self {
            Self::Start { element, .. } | Self::End { element, .. } => Some(element.name),
            Self::CharacterData { .. } => None,
        }
    }
}

/// Arena location of one line staged before a start tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AttrSlot {
    pub name: ArenaSlice,
    pub value: ArenaSlice,
    /// `None` for a non-attribute line held back to keep echo order
    pub declared: Option<DeclaredValue>,
    /// Original line, for verbatim pass-through
    pub raw: ArenaSlice,
}

impl AttrSlot {
    pub fn attribute<'a>(&self, arena: &'a Arena) -> Option<Attribute<'a>> {
        let declared = self.declared?;
        Some(Attribute::with_declared(arena.slice(self.name), arena.slice(self.value), declared))
    }
}

/// Open-element record kept by the reader.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    /// Arena checkpoint taken when the frame was pushed
    pub base: Ref,
    pub name: ArenaSlice,
    pub attr_start: usize,
    pub attr_count: usize,
    pub target: Target,
    /// False while only attributes have been seen
    pub started: bool,
}

/// The elements enclosing the one being reported, innermost first.
///
/// An element never sees itself: during `<E>`'s start, data and end
/// callbacks the environment is whatever encloses `E`.
///
/// ```text
/// <o>...<E>...<F>...</F>...<G>...</G>...</E>...</o>
///       ooooooEEEEEEEEEEoooEEEEEEEEEEooooooo
/// ```
#[derive(Clone, Copy)]
pub struct Env<'a> {
    pub(crate) arena: &'a Arena,
    pub(crate) frames: &'a [Frame],
    pub(crate) attrs: &'a [AttrSlot],
}

impl<'a> Env<'a> {
    /// Number of enclosing open elements.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if the reported element is at top level.
    pub fn is_top_level(&self) -> bool {
        self.frames.is_empty()
    }

    /// The enclosing element `level` steps out (0 = immediate parent).
    pub fn get(&self, level: usize) -> Option<OpenElement<'a>> {
        let idx = self.frames.len().checked_sub(level + 1)?;
        Some(OpenElement { env: *self, frame: self.frames[idx] })
    }

    /// The immediate parent, if any.
    pub fn parent(&self) -> Option<OpenElement<'a>> {
        self.get(0)
    }

    /// Enclosing elements, innermost first.
    pub fn iter(&self) -> impl Iterator<Item = OpenElement<'a>> + 'a {
        let env = *self;
        (0..env.depth()).filter_map(move |level| env.get(level))
    }
}

impl std::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|e| String::from_utf8_lossy(e.name()).into_owned()))
            .finish()
    }
}

/// An enclosing element as seen through [`Env`].
#[derive(Clone, Copy)]
pub struct OpenElement<'a> {
    env: Env<'a>,
    frame: Frame,
}

impl<'a> OpenElement<'a> {
    pub fn name(&self) -> &'a [u8] {
        self.env.arena.slice(self.frame.name)
    }

    /// Attributes in staging order, implied ones included.
    pub fn attrs(&self) -> impl Iterator<Item = Attribute<'a>> + 'a {
        let arena = self.env.arena;
        let end = self.frame.attr_start + self.frame.attr_count;
        self.env.attrs[self.frame.attr_start..end]
            .iter()
            .filter_map(move |slot| slot.attribute(arena))
    }

    /// Look up an attribute value by name (first match with a value).
    pub fn attr(&self, name: &[u8]) -> Option<&'a [u8]> {
        self.attrs()
            .find(|a| a.name == name && !a.is_implied())
            .map(|a| a.value)
    }
}
