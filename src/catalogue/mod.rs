//! Agricultural reference catalogue.
//!
//! Crops, their planting periods per region, soil types and which crops suit
//! which soils. The responder only reads from it; the SQLite provider seeds a
//! small Burkina Faso data set on first start.
//!
//! - [`CatalogueStore`]: read interface used by the responder
//! - [`sqlite::SqliteCatalogue`]: `sqlx` SQLite provider
//! - [`aliases`]: spelling variants that map to canonical crop names

pub mod aliases;
pub mod seed;
pub mod sqlite;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use sqlite::SqliteCatalogue;

/// Catalogue failures.
#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, CatalogueError>;

/// A cultivated crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    pub id: i64,
    pub name: String,
    pub kind: Option<String>,
    pub cycle_days: Option<i64>,
    pub description: Option<String>,
}

/// When a crop is planted in one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantingPeriod {
    pub region: String,
    /// 1-12.
    pub start_month: u32,
    /// 1-12; smaller than `start_month` when the period wraps the year end.
    pub end_month: u32,
    pub advice: Option<String>,
    /// Copied from the crop for convenience.
    pub cycle_days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Soil {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A soil mentioned in a question, with the crops it suits (sorted by name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilAdvice {
    pub soil: Soil,
    pub crops: Vec<String>,
}

#[async_trait]
pub trait CatalogueStore: Send + Sync + std::fmt::Debug {
    /// All crops in insertion order.
    async fn crops(&self) -> Result<Vec<Crop>>;

    /// Catalogue name of the first crop mentioned in `text`.
    ///
    /// Exact (case-insensitive) names win; spelling variants are tried next.
    async fn find_crop_in_text(&self, text: &str) -> Result<Option<String>>;

    /// Planting periods for a crop given by its catalogue name, ordered by region.
    async fn planting_periods(&self, crop: &str) -> Result<Vec<PlantingPeriod>>;

    /// Advice for the first soil type named in `text`.
    async fn soil_recommendation(&self, text: &str) -> Result<Option<SoilAdvice>>;
}
