//! Catalog sources.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::catalog::Catalog;
use crate::error::LoadError;

/// Supplies the catalog for a locale.
pub trait CatalogLoader: Send + Sync {
    /// Load the catalog for `locale`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the catalog is missing or malformed.
    fn load(&self, locale: &str) -> Result<Catalog, LoadError>;
}

/// Reads `{dir}/{locale}.json`, a flat object from message id to text.
#[derive(Clone, Debug)]
pub struct JsonCatalogLoader {
    dir: Utf8PathBuf,
}

impl JsonCatalogLoader {
    /// Load catalogs from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the catalogs.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Catalog file for `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidLocale`] for a blank tag or one that
    /// could escape the directory.
    pub fn path_for(&self, locale: &str) -> Result<Utf8PathBuf, LoadError> {
        let locale = locale.trim();
        if locale.is_empty() || locale.contains(['/', '\\']) || locale.contains("..") {
            return Err(LoadError::InvalidLocale {
                locale: locale.to_owned(),
            });
        }
        Ok(self.dir.join(format!("{locale}.json")))
    }
}

impl CatalogLoader for JsonCatalogLoader {
    fn load(&self, locale: &str) -> Result<Catalog, LoadError> {
        let path = self.path_for(locale)?;
        let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LoadError::Json { path, source })
    }
}
