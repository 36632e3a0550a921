//! glTF JSON document loading and saving

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Error, Result};

/// A glTF document held as a generic JSON tree.
///
/// Only the few fields the rewrite touches are ever read; everything else is
/// carried through untouched, in its original key order.
#[derive(Debug, Clone, PartialEq)]
pub struct GltfDocument {
    /// Where the document was loaded from and is saved back to
    pub path: PathBuf,
    /// Root JSON object
    pub root: Value,
}

impl GltfDocument {
    /// Read and parse a `.gltf` file
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be read, or
    /// [`Error::GltfParse`] if it is not a JSON object.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_str(&content, path)
    }

    /// Parse a document from a JSON string
    ///
    /// # Errors
    /// Returns [`Error::GltfParse`] if the content is malformed or its root is
    /// not an object.
    pub fn from_str(content: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let root: Value = serde_json::from_str(content).map_err(|e| Error::GltfParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        if !root.is_object() {
            return Err(Error::GltfParse {
                path,
                message: "document root is not a JSON object".to_string(),
            });
        }

        Ok(Self { path, root })
    }

    /// Serialize with 2-space indentation
    ///
    /// # Errors
    /// Returns [`Error::GltfWrite`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root).map_err(|e| Error::GltfWrite {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Write the document back to [`Self::path`]
    ///
    /// # Errors
    /// Returns [`Error::GltfWrite`] if serialization or writing fails.
    pub fn save(&self) -> Result<()> {
        let json = self.to_json_string()?;
        fs::write(&self.path, json).map_err(|e| Error::GltfWrite {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}
