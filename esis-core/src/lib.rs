//! ESIS Core
//!
//! Reader, dispatcher and writers for ESIS, the line-oriented
//! serialization of a parsed markup document's element structure.
//! No tree is built: events go straight from the input lines to
//! per-element handlers, and from there (usually) into a writer.
//!
//! ```text
//! ESIS lines ─▶ Reader ─▶ Registry ─▶ handler(cx, event, env)
//!                 │ (filter mode)              │
//!                 └──▶ echo sink               └─▶ Writer ─▶ Backend ─▶ ESIS / XML / SGML
//! ```
//!
//! # Architecture
//!
//! - **arena.rs** - Growable byte arena with mark/release
//! - **registry.rs** - Sorted element handler table with wildcard fallback
//! - **reader.rs** - Line decoder, frame stack, dispatch and pass-through
//! - **event.rs** - Attribute, element and event types, open-element view
//! - **writer.rs** - Writer front end (staging, validation, sticky errors)
//! - **backend.rs** - ESIS, XML and SGML back ends
//! - **escape.rs** - ESIS escapes and markup character references
//! - **config.rs** / **error.rs** - Settings and error types

pub mod arena;
pub mod backend;
pub mod config;
pub mod error;
pub mod escape;
pub mod event;
pub mod reader;
pub mod registry;
pub mod writer;

pub use arena::{Arena, ArenaSlice, Ref};
pub use backend::{Backend, DataKind, EsisBackend, Format, SgmlBackend, TagKind, XmlBackend};
pub use config::{ArenaConfig, Options, ReaderConfig, ARENA_CHUNK};
pub use error::{Error, Result, SyntaxCode};
pub use event::{Attribute, DeclaredValue, Element, ElementEvent, Env, EventKind, OpenElement};
pub use reader::{Reader, Stats};
pub use registry::{ElementHandler, Registry};
pub use writer::{is_name, Writer};
