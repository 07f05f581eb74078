//! 土壌種別と推奨作物テーブル
//!
//! 6種類の土壌ラベルと、それぞれに対応する作物名リスト（表示用文字列）。
//! 並び順は分類バックエンドが返す確率ベクトルのインデックス順と一致する。

use serde::{Deserialize, Serialize};

/// 未知の土壌ラベルに返す作物リスト
pub const NO_CROP_DATA: &str = "No crop data available";

/// モデル未設定時のライブスキャン結果ラベル
pub const MODEL_NOT_FOUND: &str = "Model not found";

/// 土壌種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    Laterite,
    Alluvial,
    Black,
    Red,
    Desert,
    Mountain,
}

impl SoilType {
    /// 全種別（確率ベクトルのインデックス順）
    pub const ALL: [SoilType; 6] = [
        SoilType::Laterite,
        SoilType::Alluvial,
        SoilType::Black,
        SoilType::Red,
        SoilType::Desert,
        SoilType::Mountain,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SoilType::Laterite => "Laterite",
            SoilType::Alluvial => "Alluvial",
            SoilType::Black => "Black",
            SoilType::Red => "Red",
            SoilType::Desert => "Desert",
            SoilType::Mountain => "Mountain",
        }
    }

    /// ラベルから種別を取得（完全一致）
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|soil| soil.label() == label)
    }

    /// インデックスから種別を取得
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 推奨作物リスト
    pub fn crops(&self) -> &'static [&'static str] {
        match self {
            SoilType::Laterite => &[
                "Tea", "Coffee", "Cashew", "Coconut", "Rubber",
                "Arecanut", "Tapioca", "Spices", "Pineapple", "Jackfruit",
            ],
            SoilType::Alluvial => &[
                "Rice", "Wheat", "Sugarcane", "Jute", "Maize",
                "Barley", "Pulses", "Oilseeds", "Fruits", "Vegetables",
            ],
            SoilType::Black => &[
                "Cotton", "Soybean", "Sunflower", "Groundnut",
                "Tobacco", "Millets", "Citrus Fruits", "Pomegranate",
            ],
            SoilType::Red => &[
                "Groundnut", "Millets", "Cotton", "Wheat", "Pulses",
                "Potato", "Oilseeds", "Onion", "Tomato", "Chillies",
            ],
            SoilType::Desert => &[
                "Bajra", "Barley", "Guar", "Mustard", "Cumin",
                "Dates", "Castor", "Fodder Crops", "Jowar", "Moth Beans",
            ],
            SoilType::Mountain => &[
                "Apple", "Peach", "Plum", "Maize", "Barley",
                "Tea", "Walnut", "Almond", "Pear", "Medicinal Herbs",
            ],
        }
    }

    /// ラベルから作物リストを引く。未知のラベルは NO_CROP_DATA のみ
    pub fn crops_for_label(label: &str) -> Vec<String> {
        match Self::from_label(label) {
            Some(soil) => soil.crops().iter().map(|c| c.to_string()).collect(),
            None => vec![NO_CROP_DATA.to_string()],
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip_for_all_types() {
        for soil in SoilType::ALL {
            assert_eq!(SoilType::from_label(soil.label()), Some(soil));
        }
    }

    #[test]
    fn test_label_lookup_is_case_sensitive() {
        assert_eq!(SoilType::from_label("laterite"), None);
        assert_eq!(SoilType::from_label(" Red"), None);
    }

    #[test]
    fn test_index_order() {
        assert_eq!(SoilType::from_index(0), Some(SoilType::Laterite));
        assert_eq!(SoilType::from_index(5), Some(SoilType::Mountain));
        assert_eq!(SoilType::from_index(6), None);
    }

    #[test]
    fn test_crop_list_sizes() {
        for soil in SoilType::ALL {
            let n = soil.crops().len();
            assert!((8..=10).contains(&n), "{}: {}件", soil, n);
        }
        assert_eq!(SoilType::Black.crops().len(), 8);
    }

    #[test]
    fn test_crops_for_unknown_label() {
        assert_eq!(
            SoilType::crops_for_label("NotARealSoil"),
            vec![NO_CROP_DATA.to_string()]
        );
    }

    #[test]
    fn test_crops_for_known_label_keeps_order() {
        let crops = SoilType::crops_for_label("Desert");
        assert_eq!(crops.first().map(String::as_str), Some("Bajra"));
        assert_eq!(crops.last().map(String::as_str), Some("Moth Beans"));
    }
}
