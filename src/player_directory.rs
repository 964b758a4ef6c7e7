use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use deunicode::deunicode;
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::config::PeakConfig;

pub const DEFAULT_PAGE_BASE_URL: &str = "https://www.basketball-reference.com/players";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("player not found: {query}")]
pub struct LookupMiss {
    pub query: String,
}

/// Static name -> player id store, built out of band by a crawl of the
/// provider's player index.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    by_name: HashMap<String, String>,
}

impl PlayerDirectory {
    pub fn from_entries<I, N, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: AsRef<str>,
        P: Into<String>,
    {
        let mut by_name = HashMap::new();
        for (name, id) in entries {
            let key = normalize_name(name.as_ref());
            if key.is_empty() {
                continue;
            }
            by_name.insert(key, id.into());
        }
        Self { by_name }
    }

    /// Reads a JSON object of `"player name": "player id"` pairs.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read player directory {}", path.display()))?;
        let entries = serde_json::from_str::<HashMap<String, String>>(&raw)
            .with_context(|| format!("parse player directory {}", path.display()))?;
        let directory = Self::from_entries(entries);
        log::debug!(
            "loaded {} players from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    pub fn lookup(&self, name: &str) -> Result<&str, LookupMiss> {
        self.by_name
            .get(&normalize_name(name))
            .map(String::as_str)
            .ok_or_else(|| LookupMiss {
                query: name.trim().to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Directory shared by every caller of the process, loaded on first use.
pub fn shared_directory(config: &PeakConfig) -> Result<&'static PlayerDirectory> {
    static DIRECTORY: OnceCell<PlayerDirectory> = OnceCell::new();
    DIRECTORY.get_or_try_init(|| PlayerDirectory::load(&config.directory_path))
}

/// Player page locator: `<base>/j/jamesle01.html`.
pub fn player_page_url(base: &str, player_id: &str) -> Option<String> {
    let initial = player_id.chars().next()?;
    Some(format!(
        "{}/{}/{}.html",
        base.trim_end_matches('/'),
        initial.to_ascii_lowercase(),
        player_id
    ))
}

/// Lowercase, transliterated to ASCII, whitespace collapsed.
pub fn normalize_name(input: &str) -> String {
    deunicode(input)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
