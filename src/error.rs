use thiserror::Error;

/// Deterministic data-integrity failures raised while turning provider
/// documents into a [`crate::match_record::MatchRecord`]. None of these are
/// transient: retrying the same document yields the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("unparseable kickoff label: {0:?}")]
    KickoffFormat(String),

    #[error("no statistics listed for team id {0}")]
    MissingTeamStats(u32),
}
