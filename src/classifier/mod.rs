//! 土壌判定モジュール
//!
//! 3つの入口:
//! - 手動選択: ラベルをテーブルで引くだけ
//! - アップロード画像: 保存してから判定。バックエンドがなければフォールバック戦略で選ぶ
//! - ライブ撮影(Base64): バックエンドがなければ ModelUnavailable を返す
//!
//! 呼び出し間で可変状態は持たない。

pub mod backend;
pub mod preprocess;

pub use backend::{ClassificationBackend, CommandBackend, FallbackStrategy, RandomFallback};
pub use preprocess::NormalizedImage;

use crate::config::Config;
use crate::error::{Result, SoilScanError};
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use soil_scan_common::{argmax, SoilType, MODEL_NOT_FOUND};
use std::path::{Path, PathBuf};

/// ライブ撮影画像の保存名（毎回上書き）
pub const LIVE_CAPTURE_FILE_NAME: &str = "live_capture.jpg";

/// 判定結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub soil_type: String,
    pub crops: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_path: Option<PathBuf>,
}

impl ScanResult {
    pub fn for_soil(soil: SoilType, saved_path: Option<PathBuf>) -> Self {
        Self {
            soil_type: soil.label().to_string(),
            crops: soil.crops().iter().map(|c| c.to_string()).collect(),
            saved_path,
        }
    }

    /// 既知の土壌種別であれば返す
    pub fn soil(&self) -> Option<SoilType> {
        SoilType::from_label(&self.soil_type)
    }
}

/// ライブ撮影の判定結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "ScanResult")]
pub enum LiveScan {
    Classified(ScanResult),
    /// バックエンド未設定
    ModelUnavailable,
}

impl LiveScan {
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, LiveScan::ModelUnavailable)
    }

    pub fn into_scan_result(self) -> ScanResult {
        match self {
            LiveScan::Classified(result) => result,
            LiveScan::ModelUnavailable => ScanResult {
                soil_type: MODEL_NOT_FOUND.to_string(),
                crops: Vec::new(),
                saved_path: None,
            },
        }
    }
}

impl From<LiveScan> for ScanResult {
    fn from(scan: LiveScan) -> Self {
        scan.into_scan_result()
    }
}

pub struct SoilClassifier {
    uploads_dir: PathBuf,
    image_size: u32,
    backend: Option<Box<dyn ClassificationBackend>>,
    fallback: Box<dyn FallbackStrategy>,
}

impl SoilClassifier {
    /// バックエンドなし・ランダムフォールバック
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            image_size: 128,
            backend: None,
            fallback: Box::new(RandomFallback),
        }
    }

    /// 設定からバックエンドを決定（起動時に一度だけ）
    pub fn from_config(config: &Config) -> Self {
        let classifier = Self::new(config.uploads_dir.clone()).with_image_size(config.image_size);
        match &config.backend {
            Some(backend) => classifier.with_backend(Box::new(CommandBackend::from_config(backend))),
            None => classifier,
        }
    }

    pub fn with_backend(mut self, backend: Box<dyn ClassificationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_fallback(mut self, fallback: Box<dyn FallbackStrategy>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_image_size(mut self, size: u32) -> Self {
        self.image_size = size;
        self
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// 手動選択。未知のラベルはそのまま返し、作物は NO_CROP_DATA のみ
    pub fn classify_manual(&self, label: &str) -> ScanResult {
        ScanResult {
            soil_type: label.to_string(),
            crops: SoilType::crops_for_label(label),
            saved_path: None,
        }
    }

    /// アップロード画像の判定
    ///
    /// 判定結果に関わらず、元のバイト列をアップロード先に保存する。
    pub fn classify_uploaded_image(&self, bytes: &[u8], file_name: &str) -> Result<ScanResult> {
        let saved_path = self.upload_path(file_name)?;
        std::fs::create_dir_all(&self.uploads_dir)?;
        std::fs::write(&saved_path, bytes).map_err(|e| {
            SoilScanError::Storage(format!("アップロード画像を保存できません {}: {}", saved_path.display(), e))
        })?;
        tracing::info!(path = %saved_path.display(), size = bytes.len(), "upload saved");

        let soil = match &self.backend {
            Some(backend) => {
                let image = preprocess::decode_image(bytes)?;
                let resized = preprocess::resize_square(&image, self.image_size);
                self.predict(backend.as_ref(), &resized)?
            }
            None => {
                let soil = self.fallback.choose()?;
                tracing::warn!(soil = %soil, "no classification backend configured, using fallback");
                soil
            }
        };

        Ok(ScanResult::for_soil(soil, Some(saved_path)))
    }

    /// ライブ撮影（Data URI）の判定
    pub fn classify_inline_image(&self, data_uri: &str) -> Result<LiveScan> {
        let Some(backend) = &self.backend else {
            tracing::debug!("live scan requested without backend");
            return Ok(LiveScan::ModelUnavailable);
        };

        let bytes = preprocess::decode_data_uri(data_uri)?;
        let image = preprocess::decode_image(&bytes)?;
        let resized = preprocess::resize_square(&image, self.image_size);

        let saved_path = self.uploads_dir.join(LIVE_CAPTURE_FILE_NAME);
        std::fs::create_dir_all(&self.uploads_dir)?;
        DynamicImage::ImageRgb8(resized.to_rgb8())
            .save_with_format(&saved_path, ImageFormat::Jpeg)
            .map_err(|e| {
                SoilScanError::Storage(format!("撮影画像を保存できません {}: {}", saved_path.display(), e))
            })?;
        tracing::info!(path = %saved_path.display(), "live capture saved");

        let soil = self.predict(backend.as_ref(), &resized)?;
        Ok(LiveScan::Classified(ScanResult::for_soil(soil, Some(saved_path))))
    }

    fn predict(&self, backend: &dyn ClassificationBackend, resized: &DynamicImage) -> Result<SoilType> {
        let normalized = NormalizedImage::from_image(resized);
        let probabilities = backend.predict(&normalized)?;

        if probabilities.len() != SoilType::ALL.len() || probabilities.iter().any(|p| !p.is_finite()) {
            return Err(SoilScanError::Backend(format!(
                "{} の確率分布が不正です ({}要素)",
                backend.name(),
                probabilities.len()
            )));
        }
        let soil = argmax(&probabilities)
            .and_then(SoilType::from_index)
            .ok_or_else(|| SoilScanError::Backend(format!("{} の確率分布が空です", backend.name())))?;

        tracing::debug!(backend = backend.name(), soil = %soil, "soil classified");
        Ok(soil)
    }

    /// ファイル名の最後の要素だけを使う
    fn upload_path(&self, file_name: &str) -> Result<PathBuf> {
        let name = Path::new(file_name)
            .file_name()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| SoilScanError::InvalidFileName(file_name.to_string()))?;
        Ok(self.uploads_dir.join(name))
    }
}
