//! Element handler registry.
//!
//! Handlers are registered by element name (GI) with a numeric id. Names
//! live in their own arena; descriptors are sorted by name once, on the
//! first lookup after a registration, and then binary-searched for every
//! start tag.
//!
//! Lookup order for a name: exact registration, then the wildcard
//! (registered under the empty name). What happens when neither exists is
//! up to the reader (echo in filter mode, drop otherwise).

use std::ops::ControlFlow;

use crate::arena::{Arena, ArenaSlice};
use crate::error::Result;
use crate::event::{ElementEvent, Env};

/// Callback for the events of one element type.
///
/// The handler object plays the part of the per-registration user value;
/// `cx` is the context shared by all handlers of one pass (typically a
/// [`Writer`](crate::writer::Writer)). Returning `Break` stops the pass
/// after the current line.
pub trait ElementHandler<U: ?Sized> {
    fn handle(&mut self, cx: &mut U, event: ElementEvent<'_>, env: Env<'_>) -> ControlFlow<()>;
}

impl<U: ?Sized, F> ElementHandler<U> for F
where
    F: FnMut(&mut U, ElementEvent<'_>, Env<'_>) -> ControlFlow<()>,
{
    #[inline]
    fn handle(&mut self, cx: &mut U, event: ElementEvent<'_>, env: Env<'_>) -> ControlFlow<()> {
        self(cx, event, env)
    }
}

/// Sorted entry: where the name lives, the id, and which handler to call.
#[derive(Debug, Clone, Copy)]
struct Descriptor {
    name: ArenaSlice,
    id: i64,
    handler: usize,
}

/// A successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub id: i64,
    pub handler: usize,
}

/// Where an open element's events go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Handler(Resolved),
    Echo,
    Drop,
}

pub struct Registry<'h, U: ?Sized> {
    names: Arena,
    entries: Vec<Descriptor>,
    handlers: Vec<Box<dyn ElementHandler<U> + 'h>>,
    wildcard: Option<Descriptor>,
    sorted: bool,
}

impl<'h, U: ?Sized> Registry<'h, U> {
    pub fn new() -> Self {
        Self {
            names: Arena::new(),
            entries: Vec::new(),
            handlers: Vec::new(),
            wildcard: None,
            sorted: true,
        }
    }

    /// Register `handler` for element `name`; the empty name is the wildcard.
    ///
    /// If a name is registered twice, the first registration wins.
    pub fn register<H>(&mut self, name: &[u8], id: i64, handler: H) -> Result<()>
    where
        H: ElementHandler<U> + 'h,
    {
        let slot = self.names.push_slice(name)?;
        let desc = Descriptor { name: slot, id, handler: self.handlers.len() };
        self.handlers.push(Box::new(handler));

        if name.is_empty() {
            if self.wildcard.is_some() {
                log::warn!(
                    target: "esis.reader",
                    "wildcard handler registered twice, keeping the first"
                );
            } else {
                self.wildcard = Some(desc);
            }
        } else {
            self.entries.push(desc);
            self.sorted = false;
        }
        Ok(())
    }

    /// Number of registrations (including the wildcard).
    pub fn len(&self) -> usize {
        self.entries.len() + usize::from(self.wildcard.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_wildcard(&self) -> bool {
        self.wildcard.is_some()
    }

    fn sort(&mut self) {
        if self.sorted {
            return;
        }
        let names = &self.names;
        // Stable, so duplicates stay in registration order.
        self.entries.sort_by(|a, b| names.slice(a.name).cmp(names.slice(b.name)));
        self.sorted = true;
        log::debug!(target: "esis.reader", "sorted {} element handlers", self.entries.len());
    }

    /// Exact lookup, falling back to the wildcard.
    pub(crate) fn resolve(&mut self, name: &[u8]) -> Option<Resolved> {
        self.sort();
        let names = &self.names;
        let first = self.entries.partition_point(|d| names.slice(d.name) < name);
        self.entries
            .get(first)
            .filter(|d| names.slice(d.name) == name)
            .or(self.wildcard.as_ref())
            .map(|d| Resolved { id: d.id, handler: d.handler })
    }

    /// Check if `name` has its own (non-wildcard) registration.
    pub fn contains(&mut self, name: &[u8]) -> bool {
        self.sort();
        let names = &self.names;
        self.entries
            .binary_search_by(|d| names.slice(d.name).cmp(name))
            .is_ok()
    }

    #[inline]
    pub(crate) fn handler_mut(&mut self, idx: usize) -> &mut (dyn ElementHandler<U> + 'h) {
        self.handlers[idx].as_mut()
    }
}

impl<U: ?Sized> Default for Registry<'_, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: ?Sized> std::fmt::Debug for Registry<'_, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries.len())
            .field("wildcard", &self.wildcard.is_some())
            .field("sorted", &self.sorted)
            .finish()
    }
}
