use std::collections::{HashMap, HashSet};

use crate::season_table::SeasonRow;

#[derive(Debug, Default, Clone, Copy)]
struct SeasonCounts {
    total: usize,
    per_team: usize,
}

/// Makes `season` unique across the series.
///
/// A season with several rows belongs to a player traded mid-season: the
/// aggregate row is dropped when per-team rows exist, and each remaining row
/// is relabelled `"2010-11 (BOS)"`. Seasons with a single row pass through.
pub fn disambiguate(rows: Vec<SeasonRow>) -> Vec<SeasonRow> {
    let mut counts: HashMap<String, SeasonCounts> = HashMap::new();
    for row in &rows {
        let c = counts.entry(row.season.clone()).or_default();
        c.total += 1;
        if !row.is_aggregate() {
            c.per_team += 1;
        }
    }

    let mut used: HashSet<String> = HashSet::with_capacity(rows.len());
    let mut out = Vec::with_capacity(rows.len());
    for mut row in rows {
        let c = counts.get(&row.season).copied().unwrap_or_default();
        if c.total > 1 {
            if row.is_aggregate() && c.per_team > 0 {
                log::debug!("dropping aggregate row {} ({})", row.season, row.team);
                continue;
            }
            row.season = format!("{} ({})", row.season, row.team);
        }
        row.season = unique_label(&used, row.season);
        used.insert(row.season.clone());
        out.push(row);
    }
    out
}

// Same team twice in one season would otherwise collide.
fn unique_label(used: &HashSet<String>, label: String) -> String {
    if !used.contains(&label) {
        return label;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{label} #{n}");
        if !used.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
