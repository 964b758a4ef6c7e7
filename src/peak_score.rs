use serde::Serialize;

use crate::season_table::{SeasonRow, Stat};

/// Each normalized metric contributes at most this much to a season's score.
pub const PEAK_SCALE: f64 = 2.5;

/// A metric whose series maximum is not positive, so it cannot normalize.
/// Its term is zero for every row of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DegenerateNormalization {
    pub stat: Stat,
    pub max: f64,
}

#[derive(Debug, Clone)]
pub struct ScoredSeries {
    pub rows: Vec<SeasonRow>,
    pub degenerate: Vec<DegenerateNormalization>,
}

/// Peak Scorer.
///
/// `composite = k * PER / PER_max + k * WS / WS_max`, maxima taken over this
/// series only. Each maximum covers every row carrying that metric; rows
/// missing PER or WS stay unscored.
pub fn score(mut rows: Vec<SeasonRow>) -> ScoredSeries {
    let scorable = |row: &SeasonRow| row.stat(Stat::Per).zip(row.stat(Stat::WinShares));

    let per_max = series_max(&rows, Stat::Per);
    let ws_max = series_max(&rows, Stat::WinShares);

    let mut degenerate = Vec::new();
    let per_div = divisor(Stat::Per, per_max, &mut degenerate);
    let ws_div = divisor(Stat::WinShares, ws_max, &mut degenerate);

    for row in rows.iter_mut() {
        row.composite_score = scorable(&*row).map(|(per, ws)| {
            let per_term = per_div.map_or(0.0, |d| PEAK_SCALE * per / d);
            let ws_term = ws_div.map_or(0.0, |d| PEAK_SCALE * ws / d);
            per_term + ws_term
        });
    }

    ScoredSeries { rows, degenerate }
}

fn series_max(rows: &[SeasonRow], stat: Stat) -> Option<f64> {
    rows.iter()
        .filter_map(|row| row.stat(stat))
        .reduce(f64::max)
}

fn divisor(
    stat: Stat,
    max: Option<f64>,
    degenerate: &mut Vec<DegenerateNormalization>,
) -> Option<f64> {
    let max = max?;
    if max > 0.0 {
        return Some(max);
    }
    log::warn!(
        "{} maximum is {max}; its term is zeroed for this series",
        stat.column()
    );
    degenerate.push(DegenerateNormalization { stat, max });
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(season: &str, per: f64, ws: f64) -> SeasonRow {
        SeasonRow {
            season: season.to_string(),
            team: "LAL".to_string(),
            metrics: [("PER".to_string(), per), ("WS".to_string(), ws)]
                .into_iter()
                .collect(),
            composite_score: None,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn normalizes_against_series_maxima() {
        let out = score(vec![
            row("2000-01", 10.0, 1.0),
            row("2001-02", 20.0, 2.0),
            row("2002-03", 30.0, 9.0),
        ]);
        let scores: Vec<f64> = out.rows.iter().map(|r| r.composite_score.unwrap()).collect();
        assert!(approx(scores[0], 2.5 * (10.0 / 30.0) + 2.5 * (1.0 / 9.0)));
        assert!(approx(scores[1], 2.5 * (20.0 / 30.0) + 2.5 * (2.0 / 9.0)));
        assert!(approx(scores[2], 5.0));
        assert!(out.degenerate.is_empty());
    }

    #[test]
    fn single_season_scores_two_k() {
        let out = score(vec![row("2015-16", 12.3, 4.5)]);
        assert!(approx(out.rows[0].composite_score.unwrap(), 2.0 * PEAK_SCALE));
    }

    #[test]
    fn zero_win_shares_zeroes_the_term() {
        let out = score(vec![row("1990-91", 8.0, 0.0), row("1991-92", 16.0, 0.0)]);
        assert_eq!(out.degenerate.len(), 1);
        assert_eq!(out.degenerate[0].stat, Stat::WinShares);
        assert!(approx(out.rows[0].composite_score.unwrap(), 1.25));
        assert!(approx(out.rows[1].composite_score.unwrap(), 2.5));
    }

    #[test]
    fn rows_without_advanced_metrics_stay_unscored() {
        let mut partial = row("1970-71", 0.0, 0.0);
        partial.metrics.clear();
        let out = score(vec![partial, row("1971-72", 18.0, 6.0)]);
        assert!(out.rows[0].composite_score.is_none());
        assert!(approx(out.rows[1].composite_score.unwrap(), 5.0));
    }

    #[test]
    fn partial_rows_still_count_toward_their_metric_maximum() {
        let mut ws_only = row("1975-76", 0.0, 10.0);
        ws_only.metrics.remove("PER");
        let out = score(vec![ws_only, row("1976-77", 20.0, 5.0)]);
        assert!(out.rows[0].composite_score.is_none());
        assert!(approx(out.rows[1].composite_score.unwrap(), 2.5 + 2.5 * 5.0 / 10.0));
    }
}
