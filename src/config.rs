use std::env;
use std::path::PathBuf;

use crate::player_directory::DEFAULT_PAGE_BASE_URL;

const DEFAULT_DIRECTORY_PATH: &str = "assets/player_directory.json";
const DEFAULT_TABLES_DIR: &str = "data/tables";

#[derive(Debug, Clone)]
pub struct PeakConfig {
    pub directory_path: PathBuf,
    pub tables_dir: PathBuf,
    pub cache_capacity: usize,
    pub parallelism: usize,
    pub page_base_url: String,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            directory_path: PathBuf::from(DEFAULT_DIRECTORY_PATH),
            tables_dir: PathBuf::from(DEFAULT_TABLES_DIR),
            cache_capacity: 8,
            parallelism: 4,
            page_base_url: DEFAULT_PAGE_BASE_URL.to_string(),
        }
    }
}

impl PeakConfig {
    /// Reads `PEAK_*` variables; callers load `.env` files first.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let text = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let count = |name: &str| text(name).and_then(|val| val.parse::<usize>().ok());
        Self {
            directory_path: text("PEAK_DIRECTORY_PATH")
                .map(PathBuf::from)
                .unwrap_or(d.directory_path),
            tables_dir: text("PEAK_TABLES_DIR")
                .map(PathBuf::from)
                .unwrap_or(d.tables_dir),
            cache_capacity: count("PEAK_CACHE_CAPACITY")
                .unwrap_or(d.cache_capacity)
                .clamp(1, 256),
            parallelism: count("PEAK_PARALLELISM")
                .unwrap_or(d.parallelism)
                .clamp(1, 32),
            page_base_url: text("PEAK_PAGE_BASE_URL").unwrap_or(d.page_base_url),
        }
    }
}
