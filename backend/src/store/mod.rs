//! Flat-file persistence. Every document is read whole and rewritten whole.

pub mod journal;
pub mod users;

use std::io;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use uuid::Uuid;

pub use journal::{JournalStore, UserKey};
pub use users::UserStore;

/// Loads a JSON document, falling back to `T::default()` when the file is
/// missing, unreadable or does not parse.
pub async fn read_json_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Unreadable store file, treating as empty");
            return T::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Corrupt store file, treating as empty");
            T::default()
        }
    }
}

/// Replaces the file at `path` with `value` as pretty JSON. The document is
/// written to a sibling temp file unique to this call, then renamed over the
/// target. Concurrent writers each rename a complete document; the last one
/// wins.
pub async fn write_json_atomic<T>(path: &Path, value: &T) -> io::Result<()>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, bytes).await?;
    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let v: Vec<u32> = read_json_or_default(&dir.path().join("nope.json")).await;
        assert!(v.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"[{not json").unwrap();
        let v: Vec<u32> = read_json_or_default(&path).await;
        assert!(v.is_empty());
    }

    #[tokio::test]
    async fn test_write_creates_parents_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("doc.json");
        write_json_atomic(&path, &vec![1u32, 2, 3]).await.unwrap();
        write_json_atomic(&path, &vec![4u32]).await.unwrap();

        let v: Vec<u32> = read_json_or_default(&path).await;
        assert_eq!(v, vec![4]);
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_writes_never_mix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        let seed: Vec<u32> = (0..500).collect();
        write_json_atomic(&path, &seed).await.unwrap();

        for round in 0..100u32 {
            let mut tasks = Vec::new();
            for writer in 0..4u32 {
                let path = path.clone();
                tasks.push(tokio::spawn(async move {
                    let doc: Vec<u32> = vec![writer; 500 + round as usize];
                    write_json_atomic(&path, &doc).await
                }));
            }
            for task in tasks {
                task.await.unwrap().unwrap();
            }

            // Whichever writer won, the file holds one whole document.
            let raw = std::fs::read(&path).unwrap();
            let doc: Vec<u32> = serde_json::from_slice(&raw).unwrap();
            assert_eq!(doc.len(), 500 + round as usize);
            assert!(doc.windows(2).all(|w| w[0] == w[1]));
        }
    }
}
