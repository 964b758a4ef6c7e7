use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::disambiguate::disambiguate;
use crate::peak_score::score;
use crate::peak_select::{PeakResult, SelectError, select};
use crate::season_table::{RawRow, filter_rows};
use crate::table_merge::merge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Competition {
    RegularSeason,
    Playoffs,
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Competition::RegularSeason => f.write_str("regular season"),
            Competition::Playoffs => f.write_str("playoff"),
        }
    }
}

/// The raw tables of one player page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerTables {
    pub player_id: String,
    pub per_game: Vec<RawRow>,
    pub advanced: Vec<RawRow>,
    #[serde(default)]
    pub playoff_per_game: Option<Vec<RawRow>>,
    #[serde(default)]
    pub playoff_advanced: Option<Vec<RawRow>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerPeakData {
    pub player_id: String,
    pub regular: PeakResult,
    pub playoffs: Option<PeakResult>,
}

impl PlayerPeakData {
    pub fn result(&self, competition: Competition) -> Option<&PeakResult> {
        match competition {
            Competition::RegularSeason => Some(&self.regular),
            Competition::Playoffs => self.playoffs.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeakError {
    #[error(
        "player {player_id}: no valid {competition} rows ({})",
        empty_tables(.per_game_rows, .advanced_rows)
    )]
    EmptySeries {
        player_id: String,
        competition: Competition,
        per_game_rows: usize,
        advanced_rows: usize,
    },
    #[error("player {player_id}: no {competition} season carries both PER and WS")]
    NoScorableSeasons {
        player_id: String,
        competition: Competition,
    },
}

fn empty_tables(per_game_rows: &usize, advanced_rows: &usize) -> String {
    match (*per_game_rows, *advanced_rows) {
        (0, 0) => "per-game and advanced tables are empty".to_string(),
        (0, _) => "per-game table is empty".to_string(),
        (_, 0) => "advanced table is empty".to_string(),
        (p, a) => format!("{p} per-game and {a} advanced rows merged to nothing"),
    }
}

/// Runs Row Filter through Peak Selector for both competition contexts.
///
/// Only the regular season can fail the run; a playoff failure means the
/// player has no playoff data.
pub fn run(tables: &PlayerTables) -> Result<PlayerPeakData, PeakError> {
    let regular = run_context(
        &tables.player_id,
        Competition::RegularSeason,
        &tables.per_game,
        &tables.advanced,
    )?;

    let playoffs = match (&tables.playoff_per_game, &tables.playoff_advanced) {
        (Some(per_game), Some(advanced)) => {
            match run_context(&tables.player_id, Competition::Playoffs, per_game, advanced) {
                Ok(result) => Some(result),
                Err(err) => {
                    log::info!("{err}; treating as no playoff appearances");
                    None
                }
            }
        }
        _ => {
            log::info!("player {}: no playoff tables supplied", tables.player_id);
            None
        }
    };

    log::info!(
        "player {}: regular season peak {} ({:.3})",
        tables.player_id,
        regular.headline.season,
        regular.headline.composite_score
    );

    Ok(PlayerPeakData {
        player_id: tables.player_id.clone(),
        regular,
        playoffs,
    })
}

/// One competition context through the whole chain.
pub fn run_context(
    player_id: &str,
    competition: Competition,
    per_game: &[RawRow],
    advanced: &[RawRow],
) -> Result<PeakResult, PeakError> {
    let per_game = filter_rows(per_game);
    let advanced = filter_rows(advanced);
    let empty = || PeakError::EmptySeries {
        player_id: player_id.to_string(),
        competition,
        per_game_rows: per_game.len(),
        advanced_rows: advanced.len(),
    };
    if competition == Competition::Playoffs && (per_game.is_empty() || advanced.is_empty()) {
        return Err(empty());
    }

    let merged = merge(&per_game, &advanced);
    let rows = disambiguate(merged);
    select(score(rows)).map_err(|err| match err {
        SelectError::Empty => empty(),
        SelectError::Unscored => PeakError::NoScorableSeasons {
            player_id: player_id.to_string(),
            competition,
        },
    })
}
