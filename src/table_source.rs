use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

use crate::pipeline::PlayerTables;
use crate::season_table::RawRow;

/// Supplies the raw tables of a player page. Retrieval (network, cache,
/// fixtures) is the implementor's business; the pipeline only consumes rows.
pub trait TableSource {
    fn player_tables(&self, player_id: &str) -> Result<PlayerTables>;
}

/// Table document as exported from a player page, keyed by the page's table ids.
#[derive(Debug, Deserialize)]
struct TableDocument {
    per_game: Vec<HashMap<String, Value>>,
    advanced: Vec<HashMap<String, Value>>,
    #[serde(default)]
    playoffs_per_game: Option<Vec<HashMap<String, Value>>>,
    #[serde(default)]
    playoffs_advanced: Option<Vec<HashMap<String, Value>>>,
}

/// Reads `<root>/<player id>.json`.
#[derive(Debug, Clone)]
pub struct JsonTableDir {
    root: PathBuf,
}

impl JsonTableDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, player_id: &str) -> PathBuf {
        self.root.join(format!("{player_id}.json"))
    }
}

impl TableSource for JsonTableDir {
    fn player_tables(&self, player_id: &str) -> Result<PlayerTables> {
        if player_id.is_empty()
            || !player_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("invalid player id '{player_id}'");
        }
        load_tables_file(player_id, &self.path_for(player_id))
    }
}

pub fn load_tables_file(player_id: &str, path: &Path) -> Result<PlayerTables> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read player tables {}", path.display()))?;
    parse_tables_json(player_id, &raw)
        .with_context(|| format!("parse player tables {}", path.display()))
}

pub fn parse_tables_json(player_id: &str, raw: &str) -> Result<PlayerTables> {
    let doc = serde_json::from_str::<TableDocument>(raw).context("decode table document")?;
    Ok(PlayerTables {
        player_id: player_id.to_string(),
        per_game: to_raw_rows(doc.per_game),
        advanced: to_raw_rows(doc.advanced),
        playoff_per_game: doc.playoffs_per_game.map(to_raw_rows),
        playoff_advanced: doc.playoffs_advanced.map(to_raw_rows),
    })
}

fn to_raw_rows(rows: Vec<HashMap<String, Value>>) -> Vec<RawRow> {
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(column, value)| (column, cell_text(value)))
                .collect()
        })
        .collect()
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
