//! Peak season finder for basketball players.
//!
//! ```text
//!  per-game rows   advanced rows
//!        │               │
//!        ▼               ▼
//!   season_table::filter_rows   (strict parse, drops Career / DNP rows)
//!        │               │
//!        └──────┬────────┘
//!               ▼
//!   table_merge::merge          (outer join on season + team)
//!               ▼
//!   disambiguate::disambiguate  (mid-season trades)
//!               ▼
//!   peak_score::score           (2.5 * PER/PER_max + 2.5 * WS/WS_max)
//!               ▼
//!   peak_select::select         (peak season + chart series)
//! ```
//!
//! `pipeline::run` drives the chain for the regular season and playoffs.

pub mod config;
pub mod disambiguate;
pub mod peak_cache;
pub mod peak_export;
pub mod peak_score;
pub mod peak_select;
pub mod pipeline;
pub mod player_directory;
pub mod season_table;
pub mod table_merge;
pub mod table_source;

pub use pipeline::{Competition, PeakError, PlayerPeakData, PlayerTables, run};
