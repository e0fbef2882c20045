//! Column naming for projection tables.
//!
//! Projections come in two layouts. The percentile layout stores each stat
//! once per [`Percentile`] as `{stat}_p{q}` (`wOBA_p50`, `K_p95`), the point
//! layout stores it once as `{stat}`. Everything downstream asks
//! [`stat_column`] for the name instead of formatting it by hand.

use crate::{error::Error, Percentile, Result};
use polars::prelude::*;

pub const PLAYER_NAME: &str = "player_name";
pub const POSITION: &str = "position";
pub const YEAR: &str = "year";
pub const CONFERENCE: &str = "conference";
pub const TEAM: &str = "team";

pub const PA: &str = "PA";
pub const IP: &str = "IP";
pub const BF: &str = "BF";

/// Identity columns that lead every leaderboard.
pub const ID_COLUMNS: [&str; 5] = [PLAYER_NAME, POSITION, YEAR, CONFERENCE, TEAM];

/// Stats that must never be negative.
pub const COUNTING_STATS: [&str; 10] = ["PA", "BF", "IP", "HR", "BB", "K", "1B", "2B", "3B", "HBP"];

// Header spellings seen in exported projection CSVs
const ALIASES: [(&str, &str); 8] = [
    ("Name", PLAYER_NAME),
    ("Player", PLAYER_NAME),
    ("Position", POSITION),
    ("Year", YEAR),
    ("Class", YEAR),
    ("Conference", CONFERENCE),
    ("Team", TEAM),
    ("WOBA", "wOBA"),
];

/// Column holding `stat`, either for one percentile or as a point value.
pub fn stat_column(stat: &str, percentile: Option<Percentile>) -> String {
    match percentile {
        Some(pct) => format!("{}_p{}", stat, pct.value()),
        None => stat.to_string(),
    }
}

/// Strips a `_p{q}` suffix, returning the bare stat name.
pub fn base_stat(column: &str) -> &str {
    match column.rsplit_once("_p") {
        Some((stat, q)) if q.parse::<Percentile>().is_ok() => stat,
        _ => column,
    }
}

/// True when the frame stores stats per percentile rather than as point values.
pub fn has_percentiles(df: &DataFrame) -> bool {
    df.get_column_names()
        .iter()
        .any(|name| name.ends_with("_p50"))
}

/// Renames known header aliases to canonical names and adds an all-null
/// `team` column when the source has none.
pub fn normalize(df: DataFrame) -> Result<DataFrame> {
    let names = df.get_column_names();
    let mut existing: Vec<&str> = Vec::new();
    let mut new: Vec<&str> = Vec::new();
    // first alias wins when a file carries several spellings of one column
    for (alias, canonical) in ALIASES {
        if names.contains(&alias) && !names.contains(&canonical) && !new.contains(&canonical) {
            existing.push(alias);
            new.push(canonical);
        }
    }
    let missing_team = !names.contains(&TEAM) && !existing.contains(&"Team");

    if !existing.is_empty() {
        log::debug!("renaming columns {:?} -> {:?}", existing, new);
    }

    let mut lf = df.lazy().rename(existing, new);
    if missing_team {
        log::debug!("no team column, filling with nulls");
        lf = lf.with_column(lit(NULL).cast(DataType::String).alias(TEAM));
    }
    Ok(lf.collect()?)
}

/// Rejects frames where a counting stat goes negative.
pub fn check_counts(df: &DataFrame) -> Result<()> {
    for series in df.get_columns() {
        let name = series.name();
        if !COUNTING_STATS.contains(&base_stat(name)) {
            continue;
        }
        if let Some(min) = series.min::<f64>()? {
            if min < 0.0 {
                return Err(Error::NegativeCount {
                    column: name.to_string(),
                    value: min,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_column_follows_layout() {
        assert_eq!(stat_column("wOBA", Some(Percentile::P75)), "wOBA_p75");
        assert_eq!(stat_column("1B", Some(Percentile::P5)), "1B_p5");
        assert_eq!(stat_column("FIP", None), "FIP");
    }

    #[test]
    fn base_stat_strips_percentile_suffix() {
        assert_eq!(base_stat("HR_p95"), "HR");
        assert_eq!(base_stat("HBP_p5"), "HBP");
        assert_eq!(base_stat("PA"), "PA");
        // not a percentile
        assert_eq!(base_stat("K_p40"), "K_p40");
    }

    #[test]
    fn normalize_renames_title_case_headers() {
        let df = df!(
            "Name" => ["Player A"],
            "Position" => ["OF"],
            "Conference" => ["SEC"],
            "WOBA" => [0.351],
            "FIP+" => [104.0],
        )
        .unwrap();

        let df = normalize(df).unwrap();
        let names = df.get_column_names();
        assert!(names.contains(&PLAYER_NAME));
        assert!(names.contains(&POSITION));
        assert!(names.contains(&CONFERENCE));
        assert!(names.contains(&"wOBA"));
        assert!(names.contains(&"FIP+"));
        assert_eq!(df.column(TEAM).unwrap().null_count(), 1);
    }

    #[test]
    fn normalize_keeps_canonical_columns() {
        let df = df!(
            "player_name" => ["Player A"],
            "team" => ["LSU"],
        )
        .unwrap();

        let df = normalize(df).unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.column(TEAM).unwrap().null_count(), 0);
    }

    #[test]
    fn normalize_uses_first_alias_only() {
        let df = df!(
            "Name" => ["Player A"],
            "Player" => ["A. Player"],
            "Year" => ["Jr"],
            "Class" => ["2026"],
        )
        .unwrap();

        let df = normalize(df).unwrap();
        assert_eq!(
            df.get_column_names(),
            [PLAYER_NAME, "Player", YEAR, "Class", TEAM]
        );
        assert_eq!(df.column(PLAYER_NAME).unwrap().str().unwrap().get(0), Some("Player A"));
        assert_eq!(df.column(YEAR).unwrap().str().unwrap().get(0), Some("Jr"));
    }

    #[test]
    fn check_counts_rejects_negative_stats() {
        let ok = df!("PA" => [120i64, 0], "BB_p50" => [10i64, 0], "wOBA_p50" => [-0.1, 0.3]).unwrap();
        assert!(check_counts(&ok).is_ok());

        let bad = df!("PA" => [120i64, 80], "K_p25" => [30i64, -2]).unwrap();
        match check_counts(&bad) {
            Err(Error::NegativeCount { column, value }) => {
                assert_eq!(column, "K_p25");
                assert_eq!(value, -2.0);
            }
            other => panic!("expected NegativeCount, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn detects_percentile_layout() {
        let pct = df!("wOBA_p50" => [0.3]).unwrap();
        let point = df!("wOBA" => [0.3]).unwrap();
        assert!(has_percentiles(&pct));
        assert!(!has_percentiles(&point));
    }
}
