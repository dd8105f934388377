use std::error::Error as StdError;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading an asset.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The file could not be read.
    #[error("could not read asset {path}: {source}")]
    Io {
        /// Resolved path of the asset.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its contents are not a valid asset of the requested type.
    #[error("could not decode asset {path}: {source}")]
    Decode {
        /// Resolved path of the asset.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// # Asset
///
/// Type that can be decoded from the raw bytes of a file.
pub trait Asset: Sized {
    /// Decodes the asset.
    fn decode(bytes: Vec<u8>) -> Result<Self, Box<dyn StdError + Send + Sync>>;
}

impl Asset for Vec<u8> {
    fn decode(bytes: Vec<u8>) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(bytes)
    }
}

impl Asset for String {
    fn decode(bytes: Vec<u8>) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(String::from_utf8(bytes)?)
    }
}

/// # Assets
///
/// Loads assets from files below a root directory.
#[derive(Clone, Debug)]
pub struct Assets {
    root: PathBuf,
}

impl Assets {
    /// Returns a loader resolving paths relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the full path of the asset.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Loads the asset at `path`.
    pub fn try_load<T: Asset>(&self, path: impl AsRef<Path>) -> Result<T, AssetError> {
        let path = self.resolve(path);
        let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;

        T::decode(bytes).map_err(|source| AssetError::Decode { path, source })
    }

    /// Loads the asset at `path`, logging and discarding any error.
    pub fn load<T: Asset>(&self, path: impl AsRef<Path>) -> Option<T> {
        match self.try_load(path) {
            Ok(asset) => Some(asset),
            Err(error) => {
                log::error!("{error}");
                None
            }
        }
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::new("assets")
    }
}
