use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One source table row as published: column name -> raw cell text.
pub type RawRow = HashMap<String, String>;

pub const SEASON_COLUMN: &str = "Season";
pub const GAMES_COLUMN: &str = "G";
/// Older pages label the team column `Tm`, newer ones `Team`.
pub const TEAM_COLUMNS: [&str; 2] = ["Tm", "Team"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Per,
    WinShares,
    FieldGoalPct,
    Points,
    Assists,
    Rebounds,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Per,
        Stat::WinShares,
        Stat::FieldGoalPct,
        Stat::Points,
        Stat::Assists,
        Stat::Rebounds,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Stat::Per => "PER",
            Stat::WinShares => "WS",
            Stat::FieldGoalPct => "FG%",
            Stat::Points => "PTS",
            Stat::Assists => "AST",
            Stat::Rebounds => "TRB",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stat::Per => "Player Efficiency Rating",
            Stat::WinShares => "Win Shares",
            Stat::FieldGoalPct => "Field Goal %",
            Stat::Points => "Points",
            Stat::Assists => "Assists",
            Stat::Rebounds => "Rebounds",
        }
    }
}

/// A row that passed the boundary parse. Only numeric cells are kept; text
/// cells (league, position) and blank numeric cells are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRow {
    pub season: String,
    pub team: String,
    pub games: f64,
    pub values: BTreeMap<String, f64>,
}

/// One season for one player in one competition context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRow {
    pub season: String,
    pub team: String,
    pub metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub composite_score: Option<f64>,
}

impl SeasonRow {
    pub fn stat(&self, stat: Stat) -> Option<f64> {
        self.metrics.get(stat.column()).copied()
    }

    pub fn is_aggregate(&self) -> bool {
        is_aggregate_team(&self.team)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRow {
    #[error("row has no season cell")]
    MissingSeason,
    #[error("'{0}' is not a single season")]
    NotASeason(String),
    #[error("season {season}: games played '{raw}' is not numeric")]
    GamesNotNumeric { season: String, raw: String },
    #[error("season {0}: row has no team cell")]
    MissingTeam(String),
}

/// `TOT` on older pages, `2TM`/`3TM`/... on newer ones.
pub fn is_aggregate_team(team: &str) -> bool {
    let team = team.trim();
    if team.eq_ignore_ascii_case("TOT") {
        return true;
    }
    let Some(count) = team
        .strip_suffix("TM")
        .or_else(|| team.strip_suffix("tm"))
    else {
        return false;
    };
    !count.is_empty() && count.chars().all(|c| c.is_ascii_digit())
}

pub fn parse_row(raw: &RawRow) -> Result<ParsedRow, InvalidRow> {
    let season = raw
        .get(SEASON_COLUMN)
        .map(|s| clean_season(s))
        .filter(|s| !s.is_empty())
        .ok_or(InvalidRow::MissingSeason)?;
    if !season.contains('-') {
        return Err(InvalidRow::NotASeason(season));
    }

    let games_raw = raw.get(GAMES_COLUMN).map(|s| s.trim()).unwrap_or("");
    let Some(games) = parse_number(games_raw) else {
        return Err(InvalidRow::GamesNotNumeric {
            season,
            raw: games_raw.to_string(),
        });
    };

    let Some(team) = TEAM_COLUMNS
        .iter()
        .find_map(|col| raw.get(*col))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    else {
        return Err(InvalidRow::MissingTeam(season));
    };

    let mut values = BTreeMap::new();
    for (column, text) in raw {
        if column == SEASON_COLUMN || TEAM_COLUMNS.contains(&column.as_str()) {
            continue;
        }
        if let Some(v) = parse_number(text) {
            values.insert(column.clone(), v);
        }
    }

    Ok(ParsedRow {
        season,
        team,
        games,
        values,
    })
}

/// Row Filter: keeps rows that describe one played season, in source order.
pub fn filter_rows(raw_rows: &[RawRow]) -> Vec<ParsedRow> {
    let mut out = Vec::with_capacity(raw_rows.len());
    for (idx, raw) in raw_rows.iter().enumerate() {
        match parse_row(raw) {
            Ok(row) => out.push(row),
            Err(err) => log::debug!("dropping source row {idx}: {err}"),
        }
    }
    out
}

fn clean_season(raw: &str) -> String {
    raw.trim().trim_end_matches('*').trim().to_string()
}

/// Strict numeric parse for provider cells: `.512`, `-0.3`, `1,024`.
/// Blank, dash-only and non-finite cells are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let cleaned = s.replace(',', "");
    if !cleaned
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+')
    {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
