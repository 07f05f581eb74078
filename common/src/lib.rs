//! Soil Scan Common Library
//!
//! CLIとサービス層で共有される型と純粋関数（I/Oなし）

pub mod error;
pub mod types;
pub mod soil;
pub mod query;
pub mod parser;

pub use error::{Error, Result};
pub use types::{CropRecord, CropSummary, FavoritesSet, Lang};
pub use soil::{SoilType, NO_CROP_DATA, MODEL_NOT_FOUND};
pub use query::{search, find_by_id, matches_query, project};
pub use parser::{extract_json, parse_prediction_response, argmax};
