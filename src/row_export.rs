use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::match_record::MatchRecord;

/// Header of the output table. "HomeTeam"/"AwayTeam" and the H/A column
/// prefixes are conventional names for the downstream consumers; the values
/// are strictly positional (team1/team2 in provider list order).
pub const CSV_HEADER: [&str; 21] = [
    "Season", "Date", "HomeTeam", "AwayTeam", "FTHG", "FTAG", "HTHG", "HTAG", "Referee", "HS",
    "AS", "HST", "AST", "HC", "AC", "HF", "AF", "HY", "AY", "HR", "AR",
];

/// Projects a fully populated record (built, then statistic-extracted) plus
/// the referee name into one output row, in the fixed column order of
/// [`CSV_HEADER`].
pub fn flatten_row(record: &MatchRecord, referee: &str) -> [String; 21] {
    let t1 = &record.team1;
    let t2 = &record.team2;
    [
        record.context.season.clone(),
        record.context.kickoff_date.clone(),
        t1.identity.short_name.clone(),
        t2.identity.short_name.clone(),
        t1.stats.fulltime_goals.to_string(),
        t2.stats.fulltime_goals.to_string(),
        t1.stats.halftime_goals.to_string(),
        t2.stats.halftime_goals.to_string(),
        referee.to_string(),
        t1.stats.shots.to_string(),
        t2.stats.shots.to_string(),
        t1.stats.shots_on_target.to_string(),
        t2.stats.shots_on_target.to_string(),
        t1.stats.corners.to_string(),
        t2.stats.corners.to_string(),
        t1.stats.fouls.to_string(),
        t2.stats.fouls.to_string(),
        t1.stats.yellow_cards.to_string(),
        t2.stats.yellow_cards.to_string(),
        t1.stats.red_cards.to_string(),
        t2.stats.red_cards.to_string(),
    ]
}

/// Append-only CSV sink for flattened rows. Writes the fixed header on
/// creation, one row per successfully processed match afterwards.
pub struct CsvSink {
    writer: csv::Writer<File>,
}

impl CsvSink {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("create output dir {}", dir.display()))?;
            }
        }
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("create output file {}", path.display()))?;
        writer.write_record(CSV_HEADER).context("write csv header")?;
        Ok(Self { writer })
    }

    pub fn append(&mut self, row: &[String; 21]) -> Result<()> {
        self.writer.write_record(row).context("write csv row")
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().context("flush csv output")
    }
}
