//! OSIS output: the event model the engine emits, its XML serialization and
//! the document envelope around a set of converted books.

mod document;
mod event;
mod writer;

pub use document::{OSIS_NAMESPACE, OSIS_VERSION, OsisDocument};
pub use event::{Element, OsisEvent, is_well_nested};
pub use writer::{events_to_string, write_events};
