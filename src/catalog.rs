//! 作物カタログストア
//!
//! JSONドキュメントから作物レコードを読み込む。読み取り専用で、
//! キャッシュせず呼び出しごとに読み直す。

use crate::error::{Result, SoilScanError};
use soil_scan_common::CropRecord;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 全レコードをカタログ順で読み込み
    pub fn load_all(&self) -> Result<Vec<CropRecord>> {
        let file = File::open(&self.path).map_err(|e| {
            SoilScanError::Storage(format!("カタログを開けません {}: {}", self.path.display(), e))
        })?;

        let records: Vec<CropRecord> = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            SoilScanError::Storage(format!("カタログが不正です {}: {}", self.path.display(), e))
        })?;

        if let Some(dup) = duplicate_id(&records) {
            return Err(SoilScanError::Storage(format!(
                "カタログのIDが重複しています {}: {}",
                self.path.display(),
                dup
            )));
        }

        tracing::debug!(path = %self.path.display(), count = records.len(), "catalog loaded");
        Ok(records)
    }
}

fn duplicate_id(records: &[CropRecord]) -> Option<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .find(|r| !seen.insert(r.id.as_str()))
        .map(|r| r.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_preserves_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crops.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "b", "name_en": "B", "name_kn": "ಬಿ"},
                {"id": "a", "name_en": "A", "name_kn": "ಎ"}
            ]"#,
        )
        .unwrap();

        let records = CatalogStore::new(&path).load_all().unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_missing_file_is_storage_error() {
        let dir = tempdir().unwrap();
        let err = CatalogStore::new(dir.path().join("none.json")).load_all().unwrap_err();
        assert!(matches!(err, SoilScanError::Storage(_)));
    }

    #[test]
    fn test_malformed_file_is_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crops.json");
        std::fs::write(&path, "{ not a list }").unwrap();

        let err = CatalogStore::new(&path).load_all().unwrap_err();
        assert!(matches!(err, SoilScanError::Storage(_)));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crops.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "a", "name_en": "A", "name_kn": "ಎ"},
                {"id": "a", "name_en": "A2", "name_kn": "ಎ2"}
            ]"#,
        )
        .unwrap();

        let err = CatalogStore::new(&path).load_all().unwrap_err();
        assert!(err.to_string().contains("重複"));
    }
}
