//! 作物カタログ検索
//!
//! 大文字小文字を無視した部分一致のみ（トークン化・ランキングなし）。
//! 結果はカタログの並び順を保つ。

use crate::types::{CropRecord, CropSummary, Lang};

/// レコードが検索語に一致するか
///
/// `needle` は小文字化済みであること
pub fn matches_query(record: &CropRecord, needle: &str) -> bool {
    record
        .searchable_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// 一覧表示用に射影
pub fn project(record: &CropRecord, lang: Lang) -> CropSummary {
    CropSummary {
        id: record.id.clone(),
        name: record.name(lang).to_string(),
        thumb: record.thumb.clone(),
        short: record.short(lang).to_string(),
    }
}

/// 検索して射影する。空の検索語はカタログ全件
pub fn search(records: &[CropRecord], query: &str, lang: Lang) -> Vec<CropSummary> {
    let needle = query.trim().to_lowercase();

    records
        .iter()
        .filter(|record| needle.is_empty() || matches_query(record, &needle))
        .map(|record| project(record, lang))
        .collect()
}

/// IDの完全一致で検索
pub fn find_by_id<'a>(records: &'a [CropRecord], id: &str) -> Option<&'a CropRecord> {
    records.iter().find(|record| record.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name_en: &str, name_kn: &str) -> CropRecord {
        CropRecord {
            id: id.to_string(),
            name_en: name_en.to_string(),
            name_kn: name_kn.to_string(),
            ..Default::default()
        }
    }

    fn catalog() -> Vec<CropRecord> {
        vec![
            CropRecord {
                short_en: "Staple cereal of the plains".to_string(),
                ..record("rice", "Rice", "ಭತ್ತ")
            },
            CropRecord {
                short_kn: "ಸಿರಿಧಾನ್ಯ".to_string(),
                ..record("ragi", "Finger Millet", "ರಾಗಿ")
            },
            CropRecord {
                desc_en: "Grown on black cotton soil".to_string(),
                thumb: "img/cotton.jpg".to_string(),
                ..record("cotton", "Cotton", "ಹತ್ತಿ")
            },
        ]
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let results = search(&catalog(), "", Lang::En);
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rice", "ragi", "cotton"]);
    }

    #[test]
    fn test_whitespace_query_is_empty() {
        assert_eq!(search(&catalog(), "   ", Lang::En).len(), 3);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let results = search(&catalog(), "RICE", Lang::En);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "rice");
    }

    #[test]
    fn test_query_matches_kannada_short_only() {
        let results = search(&catalog(), "ಸಿರಿ", Lang::Kn);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "ragi");
        assert_eq!(results[0].name, "ರಾಗಿ");
        assert_eq!(results[0].short, "ಸಿರಿಧಾನ್ಯ");
    }

    #[test]
    fn test_query_matches_long_description() {
        let results = search(&catalog(), "black cotton", Lang::En);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].thumb, "img/cotton.jpg");
    }

    #[test]
    fn test_query_without_match() {
        assert!(search(&catalog(), "wheat", Lang::En).is_empty());
    }

    #[test]
    fn test_projection_by_language() {
        let rice = &catalog()[0];
        let en = project(rice, Lang::En);
        assert_eq!(en.name, "Rice");
        assert_eq!(en.short, "Staple cereal of the plains");

        let kn = project(rice, Lang::Kn);
        assert_eq!(kn.name, "ಭತ್ತ");
        assert_eq!(kn.short, "");
    }

    #[test]
    fn test_find_by_id() {
        let records = catalog();
        assert_eq!(find_by_id(&records, "cotton").map(|r| r.name_en.as_str()), Some("Cotton"));
        assert!(find_by_id(&records, "Cotton").is_none());
    }
}
