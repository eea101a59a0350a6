//! # Pagination
//!
//! Keyset pagination over the person table.
//!
//! - [`Cursor`] is the opaque `pagina` token: the ordering key of the last
//!   record on the previous page.
//! - [`NavigationStack`] is the client-held trail of earlier cursors that
//!   makes backward paging possible without server state.
//! - [`ListQuery`] is the backend-neutral filter every storage backend
//!   translates into its own statement.

mod cursor;
mod navigation;
mod query;

pub use cursor::Cursor;
pub use navigation::NavigationStack;
pub use query::{ListQuery, SearchTerm, PAGE_SIZE};
