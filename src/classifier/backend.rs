//! 分類バックエンド
//!
//! - ClassificationBackend: 正規化画像 → 6土壌ラベルの確率分布
//! - CommandBackend: 外部コマンドに標準入出力(JSON)で問い合わせる実装
//! - FallbackStrategy: バックエンド未設定時にラベルを選ぶ戦略（既定はランダム）

use super::preprocess::NormalizedImage;
use crate::config::BackendConfig;
use crate::error::{Result, SoilScanError};
use soil_scan_common::{parse_prediction_response, SoilType};
use std::io::Write;
use std::process::{Command, Stdio};

pub trait ClassificationBackend: Send + Sync {
    /// 表示用の名前
    fn name(&self) -> &str;

    /// 確率分布（SoilType::ALL の順、6要素）
    fn predict(&self, image: &NormalizedImage) -> Result<Vec<f32>>;
}

/// バックエンド未設定時のラベル選択
pub trait FallbackStrategy: Send + Sync {
    fn choose(&self) -> Result<SoilType>;
}

/// OS乱数による一様ランダム選択
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFallback;

impl FallbackStrategy for RandomFallback {
    fn choose(&self) -> Result<SoilType> {
        let n = SoilType::ALL.len() as u32;
        // 剰余の偏りを避けるため範囲外は引き直す
        let zone = u32::MAX - (u32::MAX % n);
        loop {
            let mut bytes = [0u8; 4];
            getrandom::fill(&mut bytes)
                .map_err(|e| SoilScanError::Backend(format!("乱数生成エラー: {}", e)))?;
            let value = u32::from_le_bytes(bytes);
            if value < zone {
                return Ok(SoilType::ALL[(value % n) as usize]);
            }
        }
    }
}

/// 外部コマンドによる分類
///
/// 標準入力に `{"shape": [1, H, W, 3], "data": [...]}` を書き込み、
/// 標準出力から確率分布のJSON配列を読む。
#[derive(Debug, Clone)]
pub struct CommandBackend {
    command: String,
    args: Vec<String>,
}

impl CommandBackend {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    fn run(&self, payload: Vec<u8>) -> Result<String> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SoilScanError::Backend(format!("{} 実行エラー: {}", self.command, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SoilScanError::Backend("標準入力を開けません".into()))?;
        let writer = std::thread::spawn(move || stdin.write_all(&payload));

        let output = child
            .wait_with_output()
            .map_err(|e| SoilScanError::Backend(format!("{} 待機エラー: {}", self.command, e)))?;

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(SoilScanError::Backend(format!("標準入力書き込みエラー: {}", e))),
            Err(_) => return Err(SoilScanError::Backend("標準入力書き込みスレッドが異常終了".into())),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SoilScanError::Backend(format!(
                "{} failed (code {:?}): {}",
                self.command,
                output.status.code(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl ClassificationBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.command
    }

    fn predict(&self, image: &NormalizedImage) -> Result<Vec<f32>> {
        let payload = serde_json::to_vec(image)?;
        let response = self.run(payload)?;

        let preview: String = response.chars().take(200).collect();
        tracing::debug!(backend = %self.command, response = %preview, "backend responded");

        parse_prediction_response(&response)
            .map_err(|e| SoilScanError::Backend(format!("応答を解釈できません: {}", e)))
    }
}
