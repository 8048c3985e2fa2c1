//! JSON file storage for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::document::Document;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each document as `<encoded key>.json` in one directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Map a key to a file stem.
///
/// `[A-Za-z0-9_-]` is kept as is; every other byte becomes `%XX`, so distinct
/// keys never share a file and [`key_from_stem`] can recover the key.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

/// Inverse of [`file_stem`]. `None` for names this storage did not write.
fn key_from_stem(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut key = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = stem.get(i + 1..i + 3)?;
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            key.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            key.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(key).ok()
}

impl FileStorage {
    /// Create storage rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(io_error(&base_path))?;
        Ok(Self { base_path })
    }

    /// Storage under the platform data directory, e.g.
    /// `~/.local/share/figura/documents` on Linux.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io {
                path: "~".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine a data directory",
                ),
            })?;
        Self::new(base.join("figura").join("documents"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", file_stem(key)))
    }
}

impl Storage for FileStorage {
    fn save(&self, key: &str, document: &Document) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(key);
        let json = document.to_json_pretty();
        Box::pin(async move {
            let json = json?;
            fs::write(&path, json).map_err(io_error(&path))?;
            log::debug!("Wrote {}", path.display());
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Document>> {
        let path = self.document_path(key);
        let key = key.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(key));
            }
            let json = fs::read_to_string(&path).map_err(io_error(&path))?;
            Document::from_json(&json).map_err(|e| {
                log::error!("Failed to parse {}: {}", path.display(), e);
                StorageError::from(e)
            })
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(key);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(io_error(&path))?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let entries = fs::read_dir(&self.base_path).map_err(io_error(&self.base_path))?;
            let mut keys: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|e| e == "json"))
                .filter_map(|path| key_from_stem(path.file_stem()?.to_str()?))
                .collect();
            keys.sort();
            Ok(keys)
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.document_path(key);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Shape, Text};
    use crate::geometry::Bounds;
    use crate::storage::block_on;
    use tempfile::tempdir;

    fn sample() -> Document {
        let mut doc = Document::default();
        doc.insert(Shape::rectangle(Bounds::new(1.0, 2.0, 3.0, 4.0)).with_transparency(0.5).into());
        doc.insert(Text::new(Bounds::new(0.0, 0.0, 10.0, 10.0), "hi".to_string()).into());
        doc
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let doc = sample();

        block_on(storage.save("test-doc", &doc)).unwrap();
        assert!(dir.path().join("test-doc.json").exists());
        assert_eq!(block_on(storage.load("test-doc")).unwrap(), doc);
    }

    #[test]
    fn test_not_found_and_corrupt() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        assert!(matches!(
            block_on(storage.load("nonexistent")),
            Err(StorageError::NotFound(_))
        ));

        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        assert!(matches!(
            block_on(storage.load("broken")),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_list_only_json_files() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        block_on(storage.save("doc2", &Document::default())).unwrap();
        block_on(storage.save("doc1", &Document::default())).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(block_on(storage.list()).unwrap(), vec!["doc1", "doc2"]);
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        block_on(storage.save("test", &Document::default())).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());

        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
        block_on(storage.delete("test")).unwrap();
    }

    #[test]
    fn test_keys_are_encoded_reversibly() {
        assert_eq!(file_stem("test/doc:with*special"), "test%2Fdoc%3Awith%2Aspecial");
        assert_eq!(file_stem("plain_key-1"), "plain_key-1");
        for key in ["a/b", "a_b", "100%", "caf\u{e9}"] {
            assert_eq!(key_from_stem(&file_stem(key)).as_deref(), Some(key));
        }
        assert_eq!(key_from_stem("bad%4"), None);

        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested")).unwrap();
        let doc = sample();
        block_on(storage.save("a/b", &doc)).unwrap();
        block_on(storage.save("a_b", &Document::default())).unwrap();

        assert_eq!(block_on(storage.load("a/b")).unwrap(), doc);
        assert_eq!(block_on(storage.load("a_b")).unwrap(), Document::default());
        assert_eq!(block_on(storage.list()).unwrap(), vec!["a/b", "a_b"]);
    }
}
