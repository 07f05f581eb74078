use crate::error::{SoilScanError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CATALOG_FILE_NAME: &str = "crops.json";
const FAVORITES_FILE_NAME: &str = "favorites.json";

/// 外部分類コマンドの設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl BackendConfig {
    /// 引数リスト（先頭がコマンド）から生成。各引数はそのまま保持する
    pub fn from_args(args: &[String]) -> Option<Self> {
        let (command, rest) = args.split_first()?;
        if command.trim().is_empty() {
            return None;
        }
        Some(Self {
            command: command.clone(),
            args: rest.to_vec(),
        })
    }

    /// 空白区切りのコマンドラインから生成
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let command = parts.next()?;
        Some(Self {
            command,
            args: parts.collect(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub backend: Option<BackendConfig>,
    pub image_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            uploads_dir: PathBuf::from("static").join("uploads"),
            backend: None,
            image_size: 128,
        }
    }
}

impl Config {
    /// 設定ファイル＋環境変数
    pub fn load() -> Result<Self> {
        let mut config = Self::load_saved()?;
        config.apply_env();
        Ok(config)
    }

    /// 設定ファイルのみ（環境変数は反映しない）。保存前の編集はこちらから
    pub fn load_saved() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（存在しなければデフォルト）
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SoilScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("soil-scan").join("config.json"))
    }

    /// 環境変数を優先
    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("SOIL_SCAN_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("SOIL_SCAN_UPLOADS_DIR") {
            self.uploads_dir = PathBuf::from(dir);
        }
        if let Ok(line) = std::env::var("SOIL_SCAN_BACKEND") {
            self.backend = BackendConfig::from_command_line(&line);
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE_NAME)
    }

    pub fn favorites_path(&self) -> PathBuf {
        self.data_dir.join(FAVORITES_FILE_NAME)
    }

    pub fn validate(&self) -> Result<()> {
        if self.image_size == 0 {
            return Err(SoilScanError::Config("image_size は1以上を指定してください".into()));
        }
        if let Some(backend) = &self.backend {
            if backend.command.trim().is_empty() {
                return Err(SoilScanError::Config("バックエンドコマンドが空です".into()));
            }
        }
        Ok(())
    }
}
