//! カタログとお気に入りの型定義
//!
//! CLIとサービス層で共有される型:
//! - CropRecord: 作物カタログの1件（英語・カンナダ語）
//! - CropSummary: 検索結果の言語別射影
//! - FavoritesSet: お気に入り作物IDの順序付き集合

use serde::{Deserialize, Serialize};

/// 作物カタログのレコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRecord {
    pub id: String,

    pub name_en: String,

    pub name_kn: String,

    #[serde(default)]
    pub short_en: String,

    #[serde(default)]
    pub short_kn: String,

    #[serde(default)]
    pub desc_en: String,

    #[serde(default)]
    pub desc_kn: String,

    /// サムネイル画像の参照
    #[serde(default)]
    pub thumb: String,

    /// 上記以外のフィールド（詳細表示でそのまま返す）
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CropRecord {
    /// 言語別の名前
    pub fn name(&self, lang: Lang) -> &str {
        match lang {
            Lang::En => &self.name_en,
            Lang::Kn => &self.name_kn,
        }
    }

    /// 言語別の短い説明
    pub fn short(&self, lang: Lang) -> &str {
        match lang {
            Lang::En => &self.short_en,
            Lang::Kn => &self.short_kn,
        }
    }

    /// 検索対象のテキストフィールド
    pub fn searchable_fields(&self) -> [&str; 6] {
        [
            &self.name_en,
            &self.name_kn,
            &self.short_en,
            &self.short_kn,
            &self.desc_en,
            &self.desc_kn,
        ]
    }
}

/// 検索結果（一覧表示用）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropSummary {
    pub id: String,
    pub name: String,
    pub thumb: String,
    pub short: String,
}

/// 表示言語
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// 英語（デフォルト）
    #[default]
    En,
    /// カンナダ語
    Kn,
}

impl Lang {
    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Kn => "kn",
        }
    }
}

impl std::str::FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Lang::En),
            "kn" | "kannada" => Ok(Lang::Kn),
            _ => Err(format!("Unknown language: {}. Use en or kn", s)),
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// お気に入り作物IDの集合（挿入順を保持、重複なし）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FavoritesSet {
    ids: Vec<String>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// 末尾に追加。空文字・既存IDは追加しない
    pub fn insert(&mut self, id: &str) -> bool {
        if id.is_empty() || self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// 一致するIDを削除。存在しなければ何もしない
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|existing| existing == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<String>> for FavoritesSet {
    /// 重複は最初の出現のみ残す
    fn from(ids: Vec<String>) -> Self {
        let mut set = Self::new();
        for id in ids {
            if !set.contains(&id) {
                set.ids.push(id);
            }
        }
        set
    }
}

impl From<FavoritesSet> for Vec<String> {
    fn from(set: FavoritesSet) -> Self {
        set.ids
    }
}
