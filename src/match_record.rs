use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::RecordError;

/// Stadium the match was played at, as listed on the fixture document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ground {
    pub name: String,
    pub city: String,
}

/// Provider identity of one club. `id` is the provider's unique team key and
/// is what the statistics document is keyed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamIdentity {
    pub id: u32,
    pub name: String,
    pub short_name: String,
}

/// Per-match context shared by both teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchContext {
    pub match_id: u64,
    pub game_week_id: u64,
    pub season: String,
    pub round: u32,
    pub competition: String,
    /// Kickoff date rendered as `DD/MM/YYYY`.
    pub kickoff_date: String,
    pub ground: Ground,
    pub attendance: u64,
}

/// One team's countable in-match statistics. Everything except
/// `fulltime_goals` starts at zero and is only ever overwritten by the
/// statistic-code extraction pass; `fulltime_goals` comes from the fixture
/// document's score field and no statistic code targets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticSet {
    pub fulltime_goals: u32,
    pub halftime_goals: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    pub corners: u32,
    pub fouls: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub identity: TeamIdentity,
    pub stats: StatisticSet,
}

/// Normalized record for one match. `team1`/`team2` follow the order of the
/// provider's team list; nothing in the data confirms that the first entry
/// is the home side, so no home/away semantics are attached here. Callers
/// that want a home/away reading decide it themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub context: MatchContext,
    pub team1: TeamRecord,
    pub team2: TeamRecord,
}

impl MatchRecord {
    /// Builds a record from the provider stats document (the `entity` half;
    /// the `data` half is consumed later by
    /// [`crate::stat_codes::extract_team_stats`]). All statistic fields
    /// other than `fulltime_goals` are left at zero.
    pub fn from_document(doc: &Value) -> Result<MatchRecord, RecordError> {
        let entity = require(doc, "", "entity")?;
        let gameweek = require(entity, "entity", "gameweek")?;
        let comp_season = require(gameweek, "entity.gameweek", "compSeason")?;
        let competition = require(comp_season, "entity.gameweek.compSeason", "competition")?;
        let kickoff = require(entity, "entity", "kickoff")?;
        let ground = require(entity, "entity", "ground")?;

        let context = MatchContext {
            match_id: require_u64(entity, "entity", "id")?,
            game_week_id: require_u64(gameweek, "entity.gameweek", "id")?,
            season: require_str(comp_season, "entity.gameweek.compSeason", "label")?,
            round: require_u32(gameweek, "entity.gameweek", "gameweek")?,
            competition: require_str(
                competition,
                "entity.gameweek.compSeason.competition",
                "description",
            )?,
            kickoff_date: kickoff_date_from_label(&require_str(
                kickoff,
                "entity.kickoff",
                "label",
            )?)?,
            ground: Ground {
                name: require_str(ground, "entity.ground", "name")?,
                city: require_str(ground, "entity.ground", "city")?,
            },
            // Attendance is the one optional context field; absent means 0.
            attendance: entity.get("attendance").and_then(Value::as_u64).unwrap_or(0),
        };

        let teams = require(entity, "entity", "teams")?
            .as_array()
            .ok_or_else(|| RecordError::MissingField("entity.teams".to_string()))?;
        let [first, second] = teams.as_slice() else {
            return Err(RecordError::MissingField("entity.teams".to_string()));
        };

        Ok(MatchRecord {
            context,
            team1: team_record(first, "entity.teams[0]")?,
            team2: team_record(second, "entity.teams[1]")?,
        })
    }
}

fn team_record(value: &Value, path: &str) -> Result<TeamRecord, RecordError> {
    let team = require(value, path, "team")?;
    let team_path = format!("{path}.team");
    let identity = TeamIdentity {
        id: require_u32(team, &team_path, "id")?,
        name: require_str(team, &team_path, "name")?,
        short_name: require_str(team, &team_path, "shortName")?,
    };
    let stats = StatisticSet {
        fulltime_goals: require_u32(value, path, "score")?,
        ..StatisticSet::default()
    };
    Ok(TeamRecord { identity, stats })
}

/// Turns the provider kickoff label into `DD/MM/YYYY`. The label looks like
/// `"Sat 14 Aug 2022, 15:00 BST"`: the trailing four characters carry the
/// timezone and are dropped, and the leading weekday token is display-only
/// (the provider does not keep it consistent with the date) so it is dropped
/// rather than validated.
pub fn kickoff_date_from_label(label: &str) -> Result<String, RecordError> {
    let bad = || RecordError::KickoffFormat(label.to_string());

    let end = label.len().checked_sub(4).ok_or_else(bad)?;
    let trimmed = label.get(..end).ok_or_else(bad)?;
    let (_, rest) = trimmed.split_once(' ').ok_or_else(bad)?;

    let parsed = NaiveDateTime::parse_from_str(rest, "%d %b %Y, %H:%M").map_err(|_| bad())?;
    Ok(parsed.format("%d/%m/%Y").to_string())
}

fn require<'a>(value: &'a Value, path: &str, key: &str) -> Result<&'a Value, RecordError> {
    value
        .get(key)
        .ok_or_else(|| RecordError::MissingField(join_path(path, key)))
}

fn require_str(value: &Value, path: &str, key: &str) -> Result<String, RecordError> {
    require(value, path, key)?
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| RecordError::MissingField(join_path(path, key)))
}

fn require_u64(value: &Value, path: &str, key: &str) -> Result<u64, RecordError> {
    let field = require(value, path, key)?;
    field
        .as_u64()
        .or_else(|| field.as_f64().map(|f| f as u64))
        .ok_or_else(|| RecordError::MissingField(join_path(path, key)))
}

// Narrower fields reject out-of-range values instead of truncating.
fn require_u32(value: &Value, path: &str, key: &str) -> Result<u32, RecordError> {
    u32::try_from(require_u64(value, path, key)?)
        .map_err(|_| RecordError::MissingField(join_path(path, key)))
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
