use std::env;
use std::path::PathBuf;

use crate::analysis::compare::ComparisonOptions;

pub const DATASET_PATH_ENV: &str = "IPL_DATASET_PATH";
pub const TOP_N_ENV: &str = "IPL_TOP_N";

pub const DEFAULT_DATASET_PATH: &str = "./processed_ipl_dataset.csv";
pub const DEFAULT_TOP_N: usize = 10;
const TOP_N_RANGE: (usize, usize) = (1, 50);

/// Startup settings, read from the environment (and `.env` files).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub top_n: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AppConfig {
    /// Load `.env.local` then `.env` if present, then read the process
    /// environment. Variables already set win over file values.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(DATASET_PATH_ENV) {
            let path = path.trim();
            if path.is_empty() {
                log::warn!("{DATASET_PATH_ENV} is empty, using {DEFAULT_DATASET_PATH}");
            } else {
                config.dataset_path = PathBuf::from(path);
            }
        }

        if let Some(raw) = lookup(TOP_N_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) => {
                    let clamped = n.clamp(TOP_N_RANGE.0, TOP_N_RANGE.1);
                    if clamped != n {
                        log::warn!("{TOP_N_ENV}={n} out of range, using {clamped}");
                    }
                    config.top_n = clamped;
                }
                Err(_) => log::warn!("{TOP_N_ENV}={raw:?} is not a number, using {DEFAULT_TOP_N}"),
            }
        }

        config
    }

    pub fn comparison_options(&self) -> ComparisonOptions {
        ComparisonOptions { top_n: self.top_n }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(from_pairs(&[]), AppConfig::default());
    }

    #[test]
    fn reads_path_and_top_n() {
        let config = from_pairs(&[(DATASET_PATH_ENV, "data/ipl.parquet"), (TOP_N_ENV, " 5 ")]);
        assert_eq!(config.dataset_path, PathBuf::from("data/ipl.parquet"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.comparison_options().top_n, 5);
    }

    #[test]
    fn top_n_is_clamped() {
        assert_eq!(from_pairs(&[(TOP_N_ENV, "0")]).top_n, 1);
        assert_eq!(from_pairs(&[(TOP_N_ENV, "500")]).top_n, 50);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = from_pairs(&[(DATASET_PATH_ENV, "  "), (TOP_N_ENV, "many")]);
        assert_eq!(config, AppConfig::default());
    }
}
