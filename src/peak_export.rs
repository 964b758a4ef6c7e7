use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::peak_select::PeakResult;
use crate::pipeline::{Competition, PlayerPeakData};

pub struct ExportReport {
    pub sheets: usize,
    pub series_rows: usize,
}

enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Empty, Cell::Number)
    }
}

/// Writes a summary sheet plus one season sheet per competition context.
pub fn export_peak_workbook(path: &Path, data: &PlayerPeakData) -> Result<ExportReport> {
    let mut summary_rows: Vec<Vec<Cell>> = vec![
        vec!["Player ID".into(), data.player_id.as_str().into()],
        vec![
            "Generated".into(),
            Cell::Text(chrono::Utc::now().to_rfc3339()),
        ],
        Vec::new(),
        vec![
            "Context".into(),
            "Season".into(),
            "Team".into(),
            "Peak Score".into(),
            "PER".into(),
            "WS".into(),
            "FG%".into(),
            "PTS".into(),
            "AST".into(),
            "TRB".into(),
        ],
    ];

    let mut contexts: Vec<(Competition, &PeakResult)> =
        vec![(Competition::RegularSeason, &data.regular)];
    match data.playoffs.as_ref() {
        Some(playoffs) => contexts.push((Competition::Playoffs, playoffs)),
        None => summary_rows.push(vec!["playoffs".into(), "no playoff appearances".into()]),
    }

    for (competition, result) in &contexts {
        let h = &result.headline;
        summary_rows.push(vec![
            context_label(*competition).into(),
            h.season.as_str().into(),
            h.team.as_str().into(),
            Cell::Number(h.composite_score),
            Cell::Number(h.per),
            Cell::Number(h.win_shares),
            h.field_goal_pct.into(),
            h.points.into(),
            h.assists.into(),
            h.rebounds.into(),
        ]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary_rows)?;
    }

    let mut series_rows = 0usize;
    for (competition, result) in &contexts {
        let rows = series_sheet_rows(result);
        series_rows += rows.len() - 1;
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(*competition))?;
        write_rows(sheet, &rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        sheets: contexts.len() + 1,
        series_rows,
    })
}

fn series_sheet_rows(result: &PeakResult) -> Vec<Vec<Cell>> {
    let chart = &result.chart;
    let mut rows = Vec::with_capacity(chart.len() + 1);
    rows.push(vec![
        "Season".into(),
        "Peak Score".into(),
        "PTS".into(),
        "AST".into(),
        "TRB".into(),
    ]);
    for idx in 0..chart.len() {
        rows.push(vec![
            chart.seasons[idx].as_str().into(),
            chart.composite[idx].into(),
            chart.points[idx].into(),
            chart.assists[idx].into(),
            chart.rebounds[idx].into(),
        ]);
    }
    rows
}

fn context_label(competition: Competition) -> &'static str {
    match competition {
        Competition::RegularSeason => "regular",
        Competition::Playoffs => "playoffs",
    }
}

fn sheet_name(competition: Competition) -> &'static str {
    match competition {
        Competition::RegularSeason => "RegularSeason",
        Competition::Playoffs => "Playoffs",
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            match cell {
                Cell::Text(value) => {
                    worksheet.write_string(r, c, value)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(r, c, *value)?;
                }
                Cell::Empty => {}
            }
        }
    }
    Ok(())
}
