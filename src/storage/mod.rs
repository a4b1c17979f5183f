//! Read-only resource stores.
//!
//! A store maps forward-slash paths to byte content. The production store is
//! an [`include_dir::Dir`] compiled into the binary; [`MemoryStore`] is an
//! in-memory stand-in for tests and fixtures.

mod bundled;
mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::ResourceStore;
