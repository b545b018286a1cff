//! IPL match analytics: load a match table, clean it into a
//! [`CanonicalDataset`], and compare players, teams, venues or seasons.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;

pub use analysis::compare::{
    available_entities, compute_comparison, compute_comparison_with, ComparisonKind,
    ComparisonOptions, ComparisonRequest, MetricValue, ResultBundle,
};
pub use config::AppConfig;
pub use data::loader::load_dataset;
pub use data::model::{CanonicalDataset, MatchRecord};
pub use error::{ComparisonError, DataIntegrityError, EmptyResultWarning, UnknownEntityError};
