//! 土壌判定・作物カタログ・お気に入り管理

pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod favorites;
pub mod service;

pub use classifier::{LiveScan, ScanResult, SoilClassifier};
pub use error::{Result, SoilScanError};
pub use service::SoilScanService;
