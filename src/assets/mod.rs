//! The asset store boundary. The renderer reads exactly one named image from
//! it at startup.

use {
    std::{
        collections::HashMap,
        fs::File,
        io::{self, Cursor, Read},
        path::PathBuf,
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Unable to open asset {name:?}")]
    Open {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Unable to decode image asset {name:?}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
}

/// A byte-readable store of named assets.
pub trait AssetStore {
    /// Open the named asset for reading.
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Assets read from files below a root directory.
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    root: PathBuf,
}

impl AssetDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetStore for AssetDirectory {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(self.root.join(name))?;
        Ok(Box::new(file))
    }
}

/// Assets held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a named asset.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(name.into(), bytes);
    }

    pub fn with(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(name, bytes);
        self
    }
}

impl AssetStore for MemoryAssets {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let bytes = self.assets.get(name).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no asset named {:?}", name),
            )
        })?;
        Ok(Box::new(Cursor::new(bytes.as_slice())))
    }
}

/// Read an asset fully into memory.
pub fn read_asset(
    store: &impl AssetStore,
    name: &str,
) -> Result<Vec<u8>, AssetError> {
    let open_error = |source| AssetError::Open {
        name: name.to_owned(),
        source,
    };
    let mut reader = store.open(name).map_err(open_error)?;
    let mut bytes = vec![];
    reader.read_to_end(&mut bytes).map_err(open_error)?;
    Ok(bytes)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn memory_assets_are_readable_by_name() -> Result<(), AssetError> {
        let store = MemoryAssets::new().with("star.png", vec![1, 2, 3]);

        assert_eq!(read_asset(&store, "star.png")?, vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn missing_assets_report_the_name() {
        let store = MemoryAssets::new();

        let error = read_asset(&store, "star.png").unwrap_err();

        match error {
            AssetError::Open { name, source } => {
                assert_eq!(name, "star.png");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn directory_assets_resolve_below_the_root() {
        let store = AssetDirectory::new(env!("CARGO_MANIFEST_DIR"));

        let bytes = read_asset(&store, "Cargo.toml").unwrap();

        assert!(String::from_utf8_lossy(&bytes).contains("fireflies"));
    }
}
