//! 分類バックエンド応答パーサー
//!
//! 外部コマンドの標準出力から確率分布（JSON配列）を抽出する

use crate::error::{Error, Result};
use crate::soil::SoilType;

/// 応答からJSON配列部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 最初の `[` から最後の `]` まで
///
/// # Examples
/// ```
/// use soil_scan_common::extract_json;
///
/// let response = "probabilities: [0.1, 0.9]";
/// assert_eq!(extract_json(response).unwrap(), "[0.1, 0.9]");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + "```json".len();
        if let Some(end_offset) = response[start..].find("```") {
            return Ok(response[start..start + end_offset].trim());
        }
    }

    match (response.find('['), response.rfind(']')) {
        (Some(start), Some(end)) if end >= start => Ok(&response[start..=end]),
        _ => Err(Error::Parse("JSON配列が見つかりません".into())),
    }
}

/// 確率分布をパース
///
/// `[p0, ..., p5]` とバッチ形式 `[[p0, ..., p5]]` の両方を受け付ける。
/// 要素数は土壌種別の数（6）と一致しなければならない。
pub fn parse_prediction_response(response: &str) -> Result<Vec<f32>> {
    let json_str = extract_json(response)?;
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("確率分布のJSONパースエラー: {}", e)))?;

    let batched = matches!(value.as_array(), Some(outer) if outer.len() == 1 && outer[0].is_array());
    let row = if batched { value[0].clone() } else { value };

    let probabilities: Vec<f32> = serde_json::from_value(row)
        .map_err(|e| Error::Parse(format!("確率分布が数値配列ではありません: {}", e)))?;

    if probabilities.len() != SoilType::ALL.len() {
        return Err(Error::Parse(format!(
            "確率分布の要素数が不正: {} (期待値 {})",
            probabilities.len(),
            SoilType::ALL.len()
        )));
    }
    if probabilities.iter().any(|p| !p.is_finite()) {
        return Err(Error::Parse("確率分布に非有限値が含まれています".into()));
    }

    Ok(probabilities)
}

/// 最大値のインデックス（同値は先頭を優先）
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}
