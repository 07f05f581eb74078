use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoilScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ストレージエラー: {0}")]
    Storage(String),

    #[error("画像デコードエラー: {0}")]
    Decode(String),

    #[error("作物が見つかりません: {0}")]
    NotFound(String),

    #[error("不正なファイル名: {0:?}")]
    InvalidFileName(String),

    #[error("分類バックエンドエラー: {0}")]
    Backend(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] soil_scan_common::Error),
}

pub type Result<T> = std::result::Result<T, SoilScanError>;
