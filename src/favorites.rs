//! お気に入りストア
//!
//! 作物IDの配列をJSONドキュメントに保存する。変更のたびに全体を
//! 読み込み→変更→書き戻しする。
//!
//! ロックはしていないため、同時に届いた変更は後勝ちになる（更新の消失があり得る）。

use crate::error::{Result, SoilScanError};
use soil_scan_common::FavoritesSet;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 読み込み。ファイルがなければ空の配列で作成してから読む
    pub fn load_all(&self) -> Result<FavoritesSet> {
        if !self.path.exists() {
            self.save(&FavoritesSet::new())?;
            tracing::info!(path = %self.path.display(), "favorites document created");
        }

        let file = std::fs::File::open(&self.path).map_err(|e| self.storage_error("開けません", e))?;
        let favs: FavoritesSet = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| self.storage_error("不正です", e))?;
        Ok(favs)
    }

    /// 追加して保存。空文字・既存IDは何もしない
    pub fn add(&self, id: &str) -> Result<FavoritesSet> {
        let mut favs = self.load_all()?;
        if favs.insert(id) {
            self.save(&favs)?;
            tracing::info!(id, count = favs.len(), "favorite added");
        } else {
            tracing::debug!(id, "favorite add skipped");
        }
        Ok(favs)
    }

    /// 削除して保存。存在しなければ何もしない
    pub fn remove(&self, id: &str) -> Result<FavoritesSet> {
        let mut favs = self.load_all()?;
        if favs.remove(id) {
            self.save(&favs)?;
            tracing::info!(id, count = favs.len(), "favorite removed");
        } else {
            tracing::debug!(id, "favorite remove skipped");
        }
        Ok(favs)
    }

    /// ドキュメント全体を書き換え（一時ファイル→rename）
    pub fn save(&self, favs: &FavoritesSet) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.storage_error("ディレクトリを作成できません", e))?;

        let tmp = NamedTempFile::new_in(&dir).map_err(|e| self.storage_error("書き込めません", e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, favs)
                .map_err(|e| self.storage_error("書き込めません", e))?;
            writer.flush().map_err(|e| self.storage_error("書き込めません", e))?;
        }
        tmp.persist(&self.path)
            .map_err(|e| self.storage_error("置き換えられません", e.error))?;
        Ok(())
    }

    fn storage_error(&self, what: &str, err: impl std::fmt::Display) -> SoilScanError {
        SoilScanError::Storage(format!("お気に入りを{} {}: {}", what, self.path.display(), err))
    }
}
