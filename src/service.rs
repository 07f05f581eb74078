//! リクエスト単位の操作
//!
//! ルーティング層（CLIなど）から呼ばれる入口。各呼び出しはストアを
//! 読み直すだけで、リクエスト間で状態を共有しない。

use crate::catalog::CatalogStore;
use crate::classifier::{LiveScan, ScanResult, SoilClassifier};
use crate::config::Config;
use crate::error::{Result, SoilScanError};
use crate::favorites::FavoritesStore;
use soil_scan_common::{find_by_id, search, CropRecord, CropSummary, FavoritesSet, Lang, SoilType};

pub struct SoilScanService {
    catalog: CatalogStore,
    favorites: FavoritesStore,
    classifier: SoilClassifier,
}

impl SoilScanService {
    pub fn new(catalog: CatalogStore, favorites: FavoritesStore, classifier: SoilClassifier) -> Self {
        Self {
            catalog,
            favorites,
            classifier,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            CatalogStore::new(config.catalog_path()),
            FavoritesStore::new(config.favorites_path()),
            SoilClassifier::from_config(config),
        ))
    }

    pub fn classifier(&self) -> &SoilClassifier {
        &self.classifier
    }

    /// 選択可能な土壌ラベル
    pub fn soil_types(&self) -> &'static [SoilType] {
        &SoilType::ALL
    }

    pub fn manual_soil_scan(&self, soil_label: &str) -> ScanResult {
        self.classifier.classify_manual(soil_label)
    }

    pub fn upload_soil_scan(&self, image_bytes: &[u8], file_name: &str) -> Result<ScanResult> {
        self.classifier.classify_uploaded_image(image_bytes, file_name)
    }

    pub fn live_soil_scan(&self, data_uri: &str) -> Result<LiveScan> {
        self.classifier.classify_inline_image(data_uri)
    }

    /// 作物一覧（検索語なし・空文字は全件）
    pub fn list_crops(&self, query: Option<&str>, lang: Option<Lang>) -> Result<Vec<CropSummary>> {
        let records = self.catalog.load_all()?;
        let results = search(&records, query.unwrap_or(""), lang.unwrap_or_default());
        tracing::debug!(query = query.unwrap_or(""), hits = results.len(), "crops searched");
        Ok(results)
    }

    pub fn get_crop(&self, id: &str) -> Result<CropRecord> {
        let records = self.catalog.load_all()?;
        find_by_id(&records, id)
            .cloned()
            .ok_or_else(|| SoilScanError::NotFound(id.to_string()))
    }

    pub fn list_favorites(&self) -> Result<FavoritesSet> {
        self.favorites.load_all()
    }

    pub fn add_favorite(&self, id: &str) -> Result<FavoritesSet> {
        self.favorites.add(id)
    }

    pub fn remove_favorite(&self, id: &str) -> Result<FavoritesSet> {
        self.favorites.remove(id)
    }
}
