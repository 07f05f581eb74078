//! 画像前処理
//!
//! デコード → 固定サイズへリサイズ → RGB化 → [0,1] 正規化

use crate::error::{Result, SoilScanError};
use base64::Engine;
use image::imageops::FilterType;
use image::DynamicImage;
use regex::Regex;
use serde::Serialize;

/// 正規化済み画像（HWC順、RGB）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedImage {
    /// [バッチ, 高さ, 幅, チャンネル]
    pub shape: [usize; 4],
    pub data: Vec<f32>,
}

impl NormalizedImage {
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let data = rgb.into_raw().into_iter().map(|v| f32::from(v) / 255.0).collect();

        Self {
            shape: [1, height as usize, width as usize, 3],
            data,
        }
    }

    pub fn height(&self) -> usize {
        self.shape[1]
    }

    pub fn width(&self) -> usize {
        self.shape[2]
    }
}

/// バイト列を画像としてデコード
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| SoilScanError::Decode(e.to_string()))
}

/// アスペクト比を無視して正方形にリサイズ
pub fn resize_square(image: &DynamicImage, size: u32) -> DynamicImage {
    image.resize_exact(size, size, FilterType::CatmullRom)
}

/// `data:image/...;base64,` の接頭辞があれば除去
pub fn strip_data_uri_prefix(input: &str) -> &str {
    lazy_static::lazy_static! {
        static ref DATA_URI_PREFIX: Regex = Regex::new(r"^data:image/.+;base64,").unwrap();
    }

    match DATA_URI_PREFIX.find(input) {
        Some(m) => &input[m.end()..],
        None => input,
    }
}

/// Data URI（または素のBase64）をデコード
pub fn decode_data_uri(input: &str) -> Result<Vec<u8>> {
    let payload: String = strip_data_uri_prefix(input.trim())
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    base64::engine::general_purpose::STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| SoilScanError::Decode(format!("Base64デコード失敗: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_strip_jpeg_prefix() {
        assert_eq!(strip_data_uri_prefix("data:image/jpeg;base64,/9j/4AAQ"), "/9j/4AAQ");
    }

    #[test]
    fn test_strip_png_prefix() {
        assert_eq!(strip_data_uri_prefix("data:image/png;base64,iVBORw0KGgo="), "iVBORw0KGgo=");
    }

    #[test]
    fn test_strip_without_prefix() {
        assert_eq!(strip_data_uri_prefix("iVBORw0KGgo="), "iVBORw0KGgo=");
        assert_eq!(strip_data_uri_prefix("data:text/plain;base64,aGk="), "data:text/plain;base64,aGk=");
    }

    #[test]
    fn test_decode_data_uri_invalid_base64() {
        let err = decode_data_uri("data:image/png;base64,@@@@").unwrap_err();
        assert!(matches!(err, SoilScanError::Decode(_)));
    }

    #[test]
    fn test_decode_data_uri_ignores_line_breaks() {
        let bytes = decode_data_uri("data:image/png;base64,aGVs\nbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_image_rejects_garbage() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, SoilScanError::Decode(_)));
    }

    #[test]
    fn test_normalize_range_and_shape() {
        let img = RgbImage::from_fn(4, 2, |x, _| if x == 0 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 0]) });
        let resized = resize_square(&DynamicImage::ImageRgb8(img), 8);
        let normalized = NormalizedImage::from_image(&resized);

        assert_eq!(normalized.shape, [1, 8, 8, 3]);
        assert_eq!(normalized.data.len(), 8 * 8 * 3);
        assert!(normalized.data.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_normalize_drops_alpha() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 0]));
        let normalized = NormalizedImage::from_image(&DynamicImage::ImageRgba8(img));

        assert_eq!(normalized.shape, [1, 2, 2, 3]);
        assert!(normalized.data.iter().all(|v| (*v - 1.0).abs() < f32::EPSILON));
    }
}
