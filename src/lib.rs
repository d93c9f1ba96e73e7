pub mod error;
pub mod markup;
pub mod match_record;
pub mod matchweek_fetch;
pub mod row_export;
pub mod stat_codes;
