use std::collections::{BTreeMap, HashMap};

use crate::season_table::{GAMES_COLUMN, ParsedRow, SeasonRow};

/// Columns both tables carry; the advanced side keeps them.
pub const REDUNDANT_PER_GAME_COLUMNS: [&str; 5] = ["Age", "Lg", "Pos", GAMES_COLUMN, "MP"];

type Key = (String, String);

fn key(row: &ParsedRow) -> Key {
    (row.season.clone(), row.team.clone())
}

/// Outer join of the per-game and advanced rows of one competition context on
/// `(season, team)`.
///
/// Output order follows the per-game table. A key only the advanced table has
/// goes in front of the first key with a later season, after any rows already
/// present for its own season. `YYYY-YY` labels order chronologically as text.
pub fn merge(per_game: &[ParsedRow], advanced: &[ParsedRow]) -> Vec<SeasonRow> {
    let mut keys: Vec<Key> = Vec::with_capacity(per_game.len().max(advanced.len()));
    let mut merged: HashMap<Key, BTreeMap<String, f64>> = HashMap::new();

    for row in per_game {
        let k = key(row);
        let metrics = merged.entry(k.clone()).or_insert_with(|| {
            keys.push(k.clone());
            BTreeMap::new()
        });
        for (column, value) in &row.values {
            if REDUNDANT_PER_GAME_COLUMNS.contains(&column.as_str()) {
                continue;
            }
            metrics.entry(column.clone()).or_insert(*value);
        }
    }

    for row in advanced {
        let k = key(row);
        if !merged.contains_key(&k) {
            log::debug!(
                "season {} ({}) only present in advanced table",
                row.season,
                row.team
            );
            let at = keys
                .iter()
                .position(|(season, _)| *season > k.0)
                .unwrap_or(keys.len());
            keys.insert(at, k.clone());
        }
        let metrics = merged.entry(k).or_default();
        for (column, value) in &row.values {
            metrics.entry(column.clone()).or_insert(*value);
        }
    }

    keys.into_iter()
        .map(|k| {
            let metrics = merged.remove(&k).unwrap_or_default();
            let (season, team) = k;
            SeasonRow {
                season,
                team,
                metrics,
                composite_score: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(season: &str, team: &str, values: &[(&str, f64)]) -> ParsedRow {
        ParsedRow {
            season: season.to_string(),
            team: team.to_string(),
            games: 70.0,
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn joins_on_season_and_team_and_drops_redundant_columns() {
        let per_game = vec![
            row("2009-10", "BOS", &[("PTS", 12.0), ("G", 80.0), ("Age", 24.0)]),
            row("2010-11", "BOS", &[("PTS", 14.0), ("G", 50.0)]),
        ];
        let advanced = vec![
            row("2009-10", "BOS", &[("PER", 15.0), ("WS", 5.0), ("G", 81.0)]),
            row("2010-11", "BOS", &[("PER", 16.0), ("WS", 6.0), ("G", 51.0)]),
        ];
        let out = merge(&per_game, &advanced);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].metrics.get("PTS"), Some(&12.0));
        assert_eq!(out[0].metrics.get("PER"), Some(&15.0));
        // games played comes from the advanced side only
        assert_eq!(out[0].metrics.get("G"), Some(&81.0));
        assert!(!out[0].metrics.contains_key("Age"));
    }

    #[test]
    fn outer_join_keeps_one_sided_rows_in_order() {
        let per_game = vec![
            row("2001-02", "NJN", &[("PTS", 10.0)]),
            row("2003-04", "NJN", &[("PTS", 12.0)]),
        ];
        let advanced = vec![
            row("2001-02", "NJN", &[("PER", 14.0)]),
            row("2002-03", "NJN", &[("PER", 15.0)]),
            row("2003-04", "NJN", &[("PER", 16.0)]),
            row("2004-05", "NJN", &[("PER", 17.0)]),
        ];
        let out = merge(&per_game, &advanced);
        let seasons: Vec<&str> = out.iter().map(|r| r.season.as_str()).collect();
        assert_eq!(seasons, vec!["2001-02", "2002-03", "2003-04", "2004-05"]);
        assert!(out[1].metrics.get("PTS").is_none());
        assert_eq!(out[1].metrics.get("PER"), Some(&15.0));
    }

    #[test]
    fn traded_season_keeps_one_row_per_team() {
        let per_game = vec![
            row("2010-11", "TOT", &[("PTS", 11.0)]),
            row("2010-11", "BOS", &[("PTS", 12.0)]),
            row("2010-11", "OKC", &[("PTS", 9.0)]),
        ];
        let advanced = per_game.clone();
        let out = merge(&per_game, &advanced);
        let teams: Vec<&str> = out.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(teams, vec!["TOT", "BOS", "OKC"]);
    }

    #[test]
    fn leading_advanced_only_season_stays_chronological() {
        let per_game = vec![
            row("2001-02", "NJN", &[("PTS", 10.0)]),
            row("2003-04", "NJN", &[("PTS", 12.0)]),
        ];
        let advanced = vec![
            row("2002-03", "NJN", &[("PER", 15.0)]),
            row("2003-04", "NJN", &[("PER", 16.0)]),
        ];
        let out = merge(&per_game, &advanced);
        let seasons: Vec<&str> = out.iter().map(|r| r.season.as_str()).collect();
        assert_eq!(seasons, vec!["2001-02", "2002-03", "2003-04"]);
    }

    #[test]
    fn advanced_only_team_follows_its_season_mates() {
        let per_game = vec![
            row("2010-11", "BOS", &[("PTS", 12.0)]),
            row("2011-12", "OKC", &[("PTS", 9.0)]),
        ];
        let advanced = vec![
            row("2009-10", "BOS", &[("PER", 13.0)]),
            row("2010-11", "BOS", &[("PER", 14.0)]),
            row("2010-11", "OKC", &[("PER", 11.0)]),
        ];
        let out = merge(&per_game, &advanced);
        let keys: Vec<(&str, &str)> = out
            .iter()
            .map(|r| (r.season.as_str(), r.team.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2009-10", "BOS"),
                ("2010-11", "BOS"),
                ("2010-11", "OKC"),
                ("2011-12", "OKC"),
            ]
        );
    }
}
