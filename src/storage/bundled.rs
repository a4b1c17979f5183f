//! Compile-time bundle backed by `include_dir`.

use super::ResourceStore;
use crate::{Error, Result};
use include_dir::Dir;
use std::borrow::Cow;

impl ResourceStore for Dir<'_> {
    fn read(&self, path: &str) -> Result<Cow<'_, [u8]>> {
        self.get_file(path)
            .map(|file| Cow::Borrowed(file.contents()))
            .ok_or_else(|| Error::NotFound {
                path: path.to_string(),
            })
    }

    fn contains(&self, path: &str) -> bool {
        self.get_file(path).is_some()
    }
}
