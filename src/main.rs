use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::Rng;
use reqwest::blocking::Client;

use epl_match_stats::match_record::MatchRecord;
use epl_match_stats::matchweek_fetch::{self, MATCH_WEEK_OFFSET, UserAgentPool};
use epl_match_stats::row_export::{CsvSink, flatten_row};
use epl_match_stats::stat_codes::extract_team_stats;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let match_week =
        parse_match_week_arg().context("usage: epl_match_stats --match-week <number>")?;
    let out_dir = env::var("EPL_DATA_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let client = matchweek_fetch::http_client()?;
    let agents = UserAgentPool::builtin();
    let mut rng = rand::thread_rng();

    let provider_week = match_week + MATCH_WEEK_OFFSET;
    let paths = matchweek_fetch::fetch_match_paths(client, &agents, &mut rng, provider_week)?;
    if paths.is_empty() {
        println!("No fixtures listed for match week {match_week}");
        return Ok(());
    }

    let out_path = out_dir.join(format!("match_stats_{match_week}.csv"));
    let mut sink = CsvSink::create(&out_path)?;

    let mut written = 0usize;
    let mut skipped = 0usize;
    for path in &paths {
        match process_match(client, &agents, &mut rng, path) {
            Ok(row) => {
                sink.append(&row)?;
                written += 1;
            }
            Err(err) => {
                // One bad match must not take down the rest of the week.
                eprintln!("[WARN] skipping {path}: {err:#}");
                skipped += 1;
            }
        }
    }
    sink.finish()?;

    println!("Match week {match_week} complete");
    println!("Output: {}", out_path.display());
    println!("Rows written: {written}/{}", paths.len());
    if skipped > 0 {
        println!("Matches skipped: {skipped}");
    }
    Ok(())
}

fn process_match(
    client: &Client,
    agents: &UserAgentPool,
    rng: &mut impl Rng,
    match_path: &str,
) -> Result<[String; 21]> {
    let referee = matchweek_fetch::fetch_referee(client, agents, rng, match_path)?;
    let doc = matchweek_fetch::fetch_match_document(client, agents, rng, match_path)?;
    let mut record = MatchRecord::from_document(&doc)?;
    extract_team_stats(&mut record, &doc)?;
    Ok(flatten_row(&record, &referee))
}

fn parse_match_week_arg() -> Option<u64> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix("--match-week=") {
            if let Ok(week) = value.trim().parse() {
                return Some(week);
            }
        }
        if arg == "--match-week" || arg == "-mw" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if let Ok(week) = next.trim().parse() {
                return Some(week);
            }
        }
    }
    None
}
