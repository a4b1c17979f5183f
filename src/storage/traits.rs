//! Resource store trait definition.

use crate::Result;
use std::borrow::Cow;

/// Trait for read-only resource stores.
///
/// Paths always use `/` as the separator, regardless of host platform.
/// Implementations must be safe for concurrent reads.
pub trait ResourceStore: Send + Sync {
    /// Reads the content stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no entry exists at `path`.
    fn read(&self, path: &str) -> Result<Cow<'_, [u8]>>;

    /// Returns true if an entry exists at `path`.
    fn contains(&self, path: &str) -> bool {
        self.read(path).is_ok()
    }
}

impl<S: ResourceStore + ?Sized> ResourceStore for &S {
    fn read(&self, path: &str) -> Result<Cow<'_, [u8]>> {
        (**self).read(path)
    }

    fn contains(&self, path: &str) -> bool {
        (**self).contains(path)
    }
}
