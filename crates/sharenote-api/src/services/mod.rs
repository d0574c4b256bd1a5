//! Application services composed from the repositories.

pub mod identity;
pub mod note_query;
pub mod sharing;

pub use identity::IdentityService;
pub use note_query::NoteQuery;
pub use sharing::SharingService;
