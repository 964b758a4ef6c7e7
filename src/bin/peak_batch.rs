use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use peak_finder::config::PeakConfig;
use peak_finder::peak_export::export_peak_workbook;
use peak_finder::player_directory::shared_directory;
use peak_finder::table_source::{JsonTableDir, TableSource};
use peak_finder::{PlayerPeakData, run};

struct BatchLine {
    name: String,
    outcome: Result<PlayerPeakData>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::init();

    let names_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: peak_batch <names file> [--export-dir <dir>]")?;
    let export_dir = parse_export_dir_arg();

    let config = PeakConfig::from_env();
    let directory = shared_directory(&config)?;
    let source = JsonTableDir::new(config.tables_dir.clone());

    let raw = fs::read_to_string(&names_path)
        .with_context(|| format!("read names file {}", names_path.display()))?;
    let names: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    let evaluate = |name: &String| BatchLine {
        name: name.clone(),
        outcome: directory
            .lookup(name)
            .map_err(anyhow::Error::from)
            .and_then(|id| source.player_tables(id))
            .and_then(|tables| run(&tables).map_err(anyhow::Error::from)),
    };

    let lines: Vec<BatchLine> = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallelism)
        .build()
    {
        Ok(pool) => pool.install(|| names.par_iter().map(evaluate).collect()),
        Err(_) => names.iter().map(evaluate).collect(),
    };

    println!("name\tplayer_id\tregular_peak\tregular_score\tplayoff_peak\tplayoff_score");
    let mut failures = 0usize;
    for line in &lines {
        match &line.outcome {
            Ok(data) => {
                let (playoff_peak, playoff_score) = match data.playoffs.as_ref() {
                    Some(p) => (
                        p.headline.season.clone(),
                        format!("{:.3}", p.headline.composite_score),
                    ),
                    None => ("-".to_string(), "-".to_string()),
                };
                println!(
                    "{}\t{}\t{}\t{:.3}\t{}\t{}",
                    line.name,
                    data.player_id,
                    data.regular.headline.season,
                    data.regular.headline.composite_score,
                    playoff_peak,
                    playoff_score
                );
                if let Some(dir) = export_dir.as_deref() {
                    export_one(dir, data)?;
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("{}: {err:#}", line.name);
            }
        }
    }

    eprintln!(
        "Processed {} players ({} failed)",
        lines.len(),
        failures
    );
    Ok(())
}

fn export_one(dir: &Path, data: &PlayerPeakData) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(format!("{}.xlsx", data.player_id));
    export_peak_workbook(&path, data)?;
    Ok(())
}

fn parse_export_dir_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(2).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--export-dir=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--export-dir" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
