use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use peak_finder::config::PeakConfig;
use peak_finder::peak_cache::PeakCache;
use peak_finder::peak_export::export_peak_workbook;
use peak_finder::peak_select::PeakResult;
use peak_finder::player_directory::{PlayerDirectory, player_page_url};
use peak_finder::table_source::{JsonTableDir, TableSource};
use peak_finder::{Competition, PlayerPeakData, run};

#[derive(Debug, Default)]
struct Args {
    name: Option<String>,
    directory: Option<PathBuf>,
    tables: Option<PathBuf>,
    export: Option<PathBuf>,
    playoffs: bool,
    json: bool,
}

struct Session {
    config: PeakConfig,
    directory: PlayerDirectory,
    source: JsonTableDir,
    cache: PeakCache,
    competition: Competition,
    json: bool,
}

impl Session {
    fn query(&mut self, name: &str) -> Result<Option<Arc<PlayerPeakData>>> {
        let player_id = match self.directory.lookup(name) {
            Ok(id) => id.to_string(),
            Err(miss) => {
                eprintln!("{miss}. Please check spelling and try again.");
                return Ok(None);
            }
        };
        if let Some(url) = player_page_url(&self.config.page_base_url, &player_id) {
            log::debug!("{name} -> {player_id} ({url})");
        }

        let source = &self.source;
        let data = self.cache.get_or_try_insert_with(&player_id, || -> Result<PlayerPeakData> {
            let tables = source.player_tables(&player_id)?;
            run(&tables).context("peak pipeline failed")
        })?;
        Ok(Some(data))
    }

    fn print(&self, name: &str, data: &PlayerPeakData) -> Result<()> {
        if self.json {
            let out = serde_json::to_string_pretty(data).context("serialize peak data")?;
            println!("{out}");
            return Ok(());
        }
        println!("{}", name.trim().to_uppercase());
        match data.result(self.competition) {
            Some(result) => print_result(result),
            None => println!("Player never made the playoffs."),
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::init();

    let args = parse_args();
    let mut config = PeakConfig::from_env();
    if let Some(path) = args.directory.clone() {
        config.directory_path = path;
    }
    if let Some(dir) = args.tables.clone() {
        config.tables_dir = dir;
    }

    let directory = PlayerDirectory::load(&config.directory_path)?;
    let mut session = Session {
        source: JsonTableDir::new(config.tables_dir.clone()),
        cache: PeakCache::new(config.cache_capacity),
        directory,
        config,
        competition: if args.playoffs {
            Competition::Playoffs
        } else {
            Competition::RegularSeason
        },
        json: args.json,
    };

    if let Some(name) = args.name.as_deref() {
        let Some(data) = session.query(name)? else {
            std::process::exit(1);
        };
        session.print(name, &data)?;
        if let Some(path) = args.export.as_deref() {
            let report = export_peak_workbook(path, &data)?;
            eprintln!(
                "Wrote {} ({} sheets, {} season rows)",
                path.display(),
                report.sheets,
                report.series_rows
            );
        }
        return Ok(());
    }

    interactive(&mut session)
}

fn interactive(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "player> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let name = line.trim();
        match name {
            "" => continue,
            ":q" | ":quit" => return Ok(()),
            ":playoffs" => {
                session.competition = Competition::Playoffs;
                continue;
            }
            ":regular" => {
                session.competition = Competition::RegularSeason;
                continue;
            }
            _ => {}
        }
        match session.query(name) {
            Ok(Some(data)) => session.print(name, &data)?,
            Ok(None) => {}
            Err(err) => eprintln!("error: {err:#}"),
        }
    }
}

fn print_result(result: &PeakResult) {
    let h = &result.headline;
    println!("Peak season: {} ({})", h.season, h.team);
    println!("  Peak score:               {:.3}", h.composite_score);
    println!("  Player Efficiency Rating: {:.1}", h.per);
    println!("  Win Shares:               {:.1}", h.win_shares);
    println!(
        "  Field Goal %:             {}",
        fmt_opt(h.field_goal_pct.map(|v| 100.0 * v), 1)
    );
    println!("  Points:                   {}", fmt_opt(h.points, 1));
    println!("  Assists:                  {}", fmt_opt(h.assists, 1));
    println!("  Rebounds:                 {}", fmt_opt(h.rebounds, 1));
    for d in &result.degenerate {
        println!(
            "  note: every {} is {} or lower, so it was left out of the score",
            d.stat.column(),
            d.max
        );
    }
    println!();
    println!("{:<16} {:>7} {:>6} {:>6} {:>6}", "Season", "Score", "PTS", "AST", "TRB");
    let chart = &result.chart;
    for idx in 0..chart.len() {
        println!(
            "{:<16} {:>7} {:>6} {:>6} {:>6}",
            chart.seasons[idx],
            fmt_opt(chart.composite[idx], 3),
            fmt_opt(chart.points[idx], 1),
            fmt_opt(chart.assists[idx], 1),
            fmt_opt(chart.rebounds[idx], 1),
        );
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

fn parse_args() -> Args {
    let mut out = Args::default();
    let mut words: Vec<String> = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--playoffs" => out.playoffs = true,
            "--json" => out.json = true,
            "--directory" => out.directory = args.next().map(PathBuf::from),
            "--tables" => out.tables = args.next().map(PathBuf::from),
            "--export" => out.export = args.next().map(PathBuf::from),
            other => {
                if let Some(path) = other.strip_prefix("--directory=") {
                    out.directory = Some(PathBuf::from(path.trim()));
                } else if let Some(dir) = other.strip_prefix("--tables=") {
                    out.tables = Some(PathBuf::from(dir.trim()));
                } else if let Some(path) = other.strip_prefix("--export=") {
                    out.export = Some(PathBuf::from(path.trim()));
                } else {
                    words.push(other.to_string());
                }
            }
        }
    }
    if !words.is_empty() {
        out.name = Some(words.join(" "));
    }
    out
}
