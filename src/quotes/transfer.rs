//! JSON file export and import of the quote collection.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use super::book::QuoteBook;
use super::model::Quote;
use crate::error::{ImportError, Result, StorageError};

/// File name used for exports.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Write the collection, pretty-printed, to `<dir>/quotes.json`.
pub async fn export_to_dir(book: &QuoteBook, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let quotes = book.snapshot().await;
    let json = serde_json::to_string_pretty(&quotes).map_err(StorageError::from)?;

    fs::create_dir_all(dir).await.map_err(StorageError::from)?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, json).await.map_err(StorageError::from)?;

    info!(path = %path.display(), count = quotes.len(), "Quotes exported");
    Ok(path)
}

/// Parse a file's contents as a JSON array of quote-shaped records.
pub async fn read_import_file(path: impl AsRef<Path>) -> std::result::Result<Vec<Quote>, ImportError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| ImportError::Read {
            path: display.clone(),
            source,
        })?;
    // Only the outer array is checked; each element is taken as-is.
    let records: Vec<serde_json::Value> =
        serde_json::from_str(&raw).map_err(|e| ImportError::NotAnArray {
            path: display,
            reason: e.to_string(),
        })?;
    Ok(records.iter().map(Quote::from_json).collect())
}

/// Append every record from a JSON file. Returns how many were added.
pub async fn import_from_file(book: &QuoteBook, path: impl AsRef<Path>) -> Result<usize> {
    let records = read_import_file(path).await?;
    book.import(records).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::Error;
    use crate::remote::stub::StubRemote;
    use crate::store::{FileStore, LocalStore, MemoryStore};
    use tempfile::TempDir;

    async fn test_book(dir: &TempDir) -> Arc<QuoteBook> {
        let durable = Arc::new(FileStore::open(dir.path().join("data")).await.unwrap());
        let local = LocalStore::new(durable, Arc::new(MemoryStore::new()));
        QuoteBook::open(local, Arc::new(StubRemote::new(&[]).0)).await
    }

    #[tokio::test]
    async fn export_writes_pretty_json() {
        let dir = TempDir::new().unwrap();
        let book = test_book(&dir).await;

        let path = export_to_dir(&book, dir.path().join("out")).await.unwrap();
        assert!(path.ends_with(EXPORT_FILE_NAME));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  {\n    \"text\""));
        let parsed: Vec<Quote> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, book.snapshot().await);
    }

    #[tokio::test]
    async fn export_then_import_keeps_originals() {
        let dir = TempDir::new().unwrap();
        let book = test_book(&dir).await;
        book.add("extra", "Misc").await.unwrap();
        let original = book.snapshot().await;

        let path = export_to_dir(&book, dir.path()).await.unwrap();
        let added = import_from_file(&book, &path).await.unwrap();
        assert_eq!(added, original.len());

        let all = book.snapshot().await;
        assert_eq!(all.len(), original.len() * 2);
        assert_eq!(&all[..original.len()], original.as_slice());
        assert_eq!(&all[original.len()..], original.as_slice());
    }

    #[tokio::test]
    async fn import_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let book = test_book(&dir).await;
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"text": "not an array"}"#).unwrap();

        let err = import_from_file(&book, &path).await.unwrap_err();
        assert!(matches!(err, Error::Import(ImportError::NotAnArray { .. })));
        assert_eq!(book.len().await, 3);
    }

    #[tokio::test]
    async fn import_missing_file() {
        let dir = TempDir::new().unwrap();
        let book = test_book(&dir).await;
        let err = import_from_file(&book, dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Import(ImportError::Read { .. })));
    }

    #[tokio::test]
    async fn import_keeps_every_record_of_a_mixed_array() {
        let dir = TempDir::new().unwrap();
        let book = test_book(&dir).await;
        let path = dir.path().join("mixed.json");
        std::fs::write(
            &path,
            r#"[{"text": "ok", "category": "A"}, {"text": 42, "category": null}, "stray"]"#,
        )
        .unwrap();

        assert_eq!(import_from_file(&book, &path).await.unwrap(), 3);
        let all = book.snapshot().await;
        assert_eq!(all.len(), 6);
        assert_eq!(all[3], Quote::new("ok", "A"));
        assert_eq!(all[4], Quote::new("42", ""));
        assert_eq!(all[5], Quote::default());
    }

    #[tokio::test]
    async fn import_accepts_loose_records() {
        let dir = TempDir::new().unwrap();
        let book = test_book(&dir).await;
        let path = dir.path().join("loose.json");
        std::fs::write(&path, r#"[{"text": "no category"}, {"foo": 1}]"#).unwrap();

        assert_eq!(import_from_file(&book, &path).await.unwrap(), 2);
        let all = book.snapshot().await;
        assert_eq!(all[3], Quote::new("no category", ""));
        assert_eq!(all[4], Quote::new("", ""));
    }
}
