pub mod events;
pub mod manifest;
pub mod store;
pub mod types;

pub use events::{EventFeed, StoreEvent};
pub use manifest::Manifest;
pub use store::NoteStore;
pub use types::{render_digest, Note, NoteContent};
