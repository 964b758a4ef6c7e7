use serde::Serialize;
use thiserror::Error;

use crate::peak_score::{DegenerateNormalization, ScoredSeries};
use crate::season_table::{SeasonRow, Stat};

/// Headline numbers of the peak season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakSeason {
    pub season: String,
    pub team: String,
    pub composite_score: f64,
    pub per: f64,
    pub win_shares: f64,
    pub field_goal_pct: Option<f64>,
    pub points: Option<f64>,
    pub assists: Option<f64>,
    pub rebounds: Option<f64>,
}

/// Chart-ready series, aligned by position to `seasons`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CareerSeries {
    pub seasons: Vec<String>,
    pub composite: Vec<Option<f64>>,
    pub points: Vec<Option<f64>>,
    pub assists: Vec<Option<f64>>,
    pub rebounds: Vec<Option<f64>>,
}

impl CareerSeries {
    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    /// `(season, composite)` pairs for the score chart.
    pub fn score_points(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.seasons
            .iter()
            .map(String::as_str)
            .zip(self.composite.iter().copied())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PeakResult {
    pub selected: SeasonRow,
    pub headline: PeakSeason,
    pub series: Vec<SeasonRow>,
    pub chart: CareerSeries,
    pub degenerate: Vec<DegenerateNormalization>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("series has no seasons")]
    Empty,
    #[error("no season in the series carries both PER and WS")]
    Unscored,
}

/// Peak Selector: the highest composite wins, the earliest season on ties.
pub fn select(scored: ScoredSeries) -> Result<PeakResult, SelectError> {
    let ScoredSeries { rows, degenerate } = scored;
    if rows.is_empty() {
        return Err(SelectError::Empty);
    }

    let mut best: Option<(usize, f64)> = None;
    for (idx, row) in rows.iter().enumerate() {
        let Some(score) = row.composite_score else {
            continue;
        };
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((idx, score));
        }
    }
    let Some((best_idx, composite_score)) = best else {
        return Err(SelectError::Unscored);
    };

    let selected = rows[best_idx].clone();
    let headline = PeakSeason {
        season: selected.season.clone(),
        team: selected.team.clone(),
        composite_score,
        per: selected.stat(Stat::Per).unwrap_or_default(),
        win_shares: selected.stat(Stat::WinShares).unwrap_or_default(),
        field_goal_pct: selected.stat(Stat::FieldGoalPct),
        points: selected.stat(Stat::Points),
        assists: selected.stat(Stat::Assists),
        rebounds: selected.stat(Stat::Rebounds),
    };
    let chart = career_series(&rows);

    Ok(PeakResult {
        selected,
        headline,
        series: rows,
        chart,
        degenerate,
    })
}

pub fn career_series(rows: &[SeasonRow]) -> CareerSeries {
    let mut out = CareerSeries::default();
    for row in rows {
        out.seasons.push(row.season.clone());
        out.composite.push(row.composite_score);
        out.points.push(row.stat(Stat::Points));
        out.assists.push(row.stat(Stat::Assists));
        out.rebounds.push(row.stat(Stat::Rebounds));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(season: &str, score: Option<f64>, pts: f64) -> SeasonRow {
        SeasonRow {
            season: season.to_string(),
            team: "SAS".to_string(),
            metrics: [
                ("PER".to_string(), 20.0),
                ("WS".to_string(), 8.0),
                ("PTS".to_string(), pts),
            ]
            .into_iter()
            .collect(),
            composite_score: score,
        }
    }

    fn scored(rows: Vec<SeasonRow>) -> ScoredSeries {
        ScoredSeries {
            rows,
            degenerate: Vec::new(),
        }
    }

    #[test]
    fn picks_maximum_and_keeps_full_series() {
        let out = select(scored(vec![
            row("1997-98", Some(3.1), 21.1),
            row("1998-99", Some(4.9), 21.7),
            row("1999-00", Some(4.2), 23.2),
        ]))
        .unwrap();
        assert_eq!(out.headline.season, "1998-99");
        assert_eq!(out.headline.points, Some(21.7));
        assert_eq!(out.headline.field_goal_pct, None);
        assert_eq!(out.chart.len(), 3);
        assert_eq!(out.chart.points, vec![Some(21.1), Some(21.7), Some(23.2)]);
        assert_eq!(out.series.len(), 3);
    }

    #[test]
    fn ties_go_to_the_earliest_season() {
        let out = select(scored(vec![
            row("2002-03", Some(5.0), 1.0),
            row("2003-04", Some(5.0), 2.0),
        ]))
        .unwrap();
        assert_eq!(out.selected.season, "2002-03");
    }

    #[test]
    fn unscored_rows_are_charted_but_never_selected() {
        let out = select(scored(vec![
            row("1972-73", None, 30.0),
            row("1973-74", Some(1.0), 25.0),
        ]))
        .unwrap();
        assert_eq!(out.selected.season, "1973-74");
        let pairs: Vec<_> = out.chart.score_points().collect();
        assert_eq!(pairs, vec![("1972-73", None), ("1973-74", Some(1.0))]);
    }

    #[test]
    fn empty_and_unscored_series_fail() {
        assert_eq!(select(scored(Vec::new())).unwrap_err(), SelectError::Empty);
        assert_eq!(
            select(scored(vec![row("1960-61", None, 10.0)])).unwrap_err(),
            SelectError::Unscored
        );
    }
}
