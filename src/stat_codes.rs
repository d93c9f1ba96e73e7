use serde_json::Value;

use crate::error::RecordError;
use crate::match_record::{MatchRecord, StatisticSet};

/// Key under which the provider lists a team's statistic entries.
const TEAM_ENTRIES_KEY: &str = "M";

/// One named statistic entry from the provider's per-team list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatEntry {
    pub name: String,
    pub value: u32,
}

/// The [`StatisticSet`] fields a provider statistic code can target.
/// Full-time goals are deliberately absent: they come from the fixture
/// document's score field and no code maps to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatField {
    HalftimeGoals,
    Shots,
    ShotsOnTarget,
    Corners,
    Fouls,
    YellowCards,
    RedCards,
}

fn stat_field_for_code(code: &str) -> Option<StatField> {
    match code {
        "first_half_goals" => Some(StatField::HalftimeGoals),
        "total_scoring_att" => Some(StatField::Shots),
        "ontarget_scoring_att" => Some(StatField::ShotsOnTarget),
        "total_corners_intobox" => Some(StatField::Corners),
        "fk_foul_lost" => Some(StatField::Fouls),
        "total_yel_card" => Some(StatField::YellowCards),
        "total_red_card" => Some(StatField::RedCards),
        _ => None,
    }
}

/// Applies an unordered entry list to one team's statistics. Recognized
/// codes overwrite the targeted field (last occurrence wins when a code
/// repeats); unrecognized codes are ignored. An empty list leaves every
/// field at its prior value, and re-applying the same list is a no-op.
pub fn apply_stat_entries(stats: &mut StatisticSet, entries: &[StatEntry]) {
    for entry in entries {
        let Some(field) = stat_field_for_code(&entry.name) else {
            continue;
        };
        match field {
            StatField::HalftimeGoals => stats.halftime_goals = entry.value,
            StatField::Shots => stats.shots = entry.value,
            StatField::ShotsOnTarget => stats.shots_on_target = entry.value,
            StatField::Corners => stats.corners = entry.value,
            StatField::Fouls => stats.fouls = entry.value,
            StatField::YellowCards => stats.yellow_cards = entry.value,
            StatField::RedCards => stats.red_cards = entry.value,
        }
    }
}

/// Populates both teams of an already-built record from the statistics
/// document's `data` mapping (stringified team id -> entry list). A team id
/// absent from the mapping fails with [`RecordError::MissingTeamStats`]; a
/// present mapping with an empty entry list is fine and leaves the team's
/// statistics untouched. A present mapping without the entry-list key is a
/// malformed document and fails with [`RecordError::MissingField`].
pub fn extract_team_stats(record: &mut MatchRecord, doc: &Value) -> Result<(), RecordError> {
    let data = doc
        .get("data")
        .ok_or_else(|| RecordError::MissingField("data".to_string()))?;

    for team in [&mut record.team1, &mut record.team2] {
        let id = team.identity.id;
        let Some(team_stats) = data.get(id.to_string()) else {
            return Err(RecordError::MissingTeamStats(id));
        };
        let list = team_stats
            .get(TEAM_ENTRIES_KEY)
            .and_then(|v| v.as_array())
            .ok_or_else(|| RecordError::MissingField(format!("data.{id}.{TEAM_ENTRIES_KEY}")))?;
        let entries = parse_stat_entries(list);
        apply_stat_entries(&mut team.stats, &entries);
    }
    Ok(())
}

fn parse_stat_entries(list: &[Value]) -> Vec<StatEntry> {
    let mut out = Vec::new();
    for entry in list {
        let Some(name) = entry.get("name").and_then(|v| v.as_str()) else {
            continue;
        };
        let Some(value) = entry.get("value").and_then(numeric_value) else {
            continue;
        };
        out.push(StatEntry {
            name: name.to_string(),
            value,
        });
    }
    out
}

// The provider emits most counts as integers but the odd one as a float.
fn numeric_value(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return Some(n as u32);
    }
    value.as_f64().map(|f| f as u32)
}

#[cfg(test)]
mod tests {
    use super::{StatEntry, apply_stat_entries, extract_team_stats};
    use crate::error::RecordError;
    use crate::match_record::MatchRecord;
    use serde_json::json;

    fn entry(name: &str, value: u32) -> StatEntry {
        StatEntry {
            name: name.to_string(),
            value,
        }
    }

    fn built_record(data: serde_json::Value) -> MatchRecord {
        let doc = json!({
            "entity": {
                "id": 75001,
                "gameweek": {
                    "id": 12345,
                    "gameweek": 2,
                    "compSeason": {
                        "label": "2022/23",
                        "competition": { "description": "Premier League" }
                    }
                },
                "kickoff": { "label": "Sat 14 Aug 2022, 15:00 BST" },
                "ground": { "name": "Emirates Stadium", "city": "London" },
                "teams": [
                    { "team": { "id": 1, "name": "Arsenal", "shortName": "ARS" }, "score": 2 },
                    { "team": { "id": 4, "name": "Chelsea", "shortName": "CHE" }, "score": 1 }
                ]
            },
            "data": data
        });
        let mut record = MatchRecord::from_document(&doc).expect("document should build");
        extract_team_stats(&mut record, &doc).expect("stats should extract");
        record
    }

    #[test]
    fn empty_entry_list_changes_nothing() {
        let mut stats = Default::default();
        apply_stat_entries(&mut stats, &[]);
        assert_eq!(stats, Default::default());

        apply_stat_entries(&mut stats, &[entry("total_scoring_att", 9)]);
        let populated = stats;
        apply_stat_entries(&mut stats, &[]);
        assert_eq!(stats, populated);
    }

    #[test]
    fn unknown_codes_are_ignored() {
        let mut stats = Default::default();
        apply_stat_entries(
            &mut stats,
            &[entry("possession_percentage", 61), entry("total_pass", 412)],
        );
        assert_eq!(stats, Default::default());
    }

    #[test]
    fn applying_the_same_list_twice_is_idempotent() {
        let entries = vec![
            entry("first_half_goals", 1),
            entry("total_scoring_att", 14),
            entry("total_yel_card", 3),
        ];
        let mut once = Default::default();
        apply_stat_entries(&mut once, &entries);
        let mut twice = once;
        apply_stat_entries(&mut twice, &entries);
        assert_eq!(once, twice);
        assert_eq!(once.halftime_goals, 1);
        assert_eq!(once.shots, 14);
        assert_eq!(once.yellow_cards, 3);
    }

    #[test]
    fn repeated_code_keeps_the_last_occurrence() {
        let mut stats = Default::default();
        apply_stat_entries(
            &mut stats,
            &[entry("total_corners_intobox", 4), entry("total_corners_intobox", 7)],
        );
        assert_eq!(stats.corners, 7);
    }

    #[test]
    fn no_code_touches_fulltime_goals() {
        let record = built_record(json!({
            "1": { "M": [
                { "name": "first_half_goals", "value": 1 },
                { "name": "ontarget_scoring_att", "value": 6 }
            ]},
            "4": { "M": [] }
        }));
        assert_eq!(record.team1.stats.fulltime_goals, 2);
        assert_eq!(record.team1.stats.halftime_goals, 1);
        assert_eq!(record.team1.stats.shots_on_target, 6);
        assert_eq!(record.team2.stats.fulltime_goals, 1);
    }

    #[test]
    fn empty_mapping_entry_is_not_an_error_but_absence_is() {
        // Team 4 present with an empty list: fine, stays at defaults.
        let record = built_record(json!({ "1": { "M": [] }, "4": { "M": [] } }));
        assert_eq!(record.team2.stats.shots, 0);

        // Team 4 absent from the mapping entirely: hard error.
        let doc = json!({ "entity": null, "data": { "1": { "M": [] } } });
        let mut record = record;
        let err = extract_team_stats(&mut record, &doc).expect_err("absent team should fail");
        assert_eq!(err, RecordError::MissingTeamStats(4));
    }

    #[test]
    fn team_present_without_entry_list_names_the_missing_key() {
        let doc = json!({ "entity": null, "data": { "1": {}, "4": { "M": [] } } });
        let mut record = built_record(json!({ "1": { "M": [] }, "4": { "M": [] } }));
        let err = extract_team_stats(&mut record, &doc).expect_err("missing list should fail");
        assert_eq!(err, RecordError::MissingField("data.1.M".to_string()));
    }
}
