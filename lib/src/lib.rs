use parse_display::{Display, FromStr};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod error;
pub mod filter;
pub mod hitters;
pub mod pitchers;
pub mod schema;
pub use error::Error;
pub use hitters::{HitterQuery, HittersDf};
pub use pitchers::{PitcherQuery, PitchersDf};

pub type Result<T> = std::result::Result<T, error::Error>;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, FromStr, Serialize, Deserialize,
)]
#[display(style = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    C,
    #[display("1B")]
    #[serde(rename = "1B")]
    FirstBase,
    #[display("2B")]
    #[serde(rename = "2B")]
    SecondBase,
    #[display("3B")]
    #[serde(rename = "3B")]
    ThirdBase,
    Ss,
    Of,
    Dh,
    Ut,
    Rhp,
    Lhp,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, FromStr, Serialize, Deserialize,
)]
pub enum ClassYear {
    Fr,
    So,
    Jr,
    Sr,
}

/// Projection percentile. Percentile-layout datasets store every projected
/// stat once per percentile as `{stat}_p{q}`.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    FromStr,
    Serialize,
    Deserialize,
)]
pub enum Percentile {
    #[display("5")]
    #[serde(rename = "5")]
    P5,
    #[display("25")]
    #[serde(rename = "25")]
    P25,
    #[default]
    #[display("50")]
    #[serde(rename = "50")]
    P50,
    #[display("75")]
    #[serde(rename = "75")]
    P75,
    #[display("95")]
    #[serde(rename = "95")]
    P95,
}

impl Percentile {
    pub const ALL: [Percentile; 5] = [
        Percentile::P5,
        Percentile::P25,
        Percentile::P50,
        Percentile::P75,
        Percentile::P95,
    ];

    pub fn value(self) -> u8 {
        match self {
            Percentile::P5 => 5,
            Percentile::P25 => 25,
            Percentile::P50 => 50,
            Percentile::P75 => 75,
            Percentile::P95 => 95,
        }
    }
}

pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let mut file = std::fs::File::open(path)?;
    let df = ParquetReader::new(&mut file).finish()?;
    Ok(df)
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Loads a projections table, picking the reader from the file extension.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let df = match ext.as_deref() {
        Some("csv") => load_csv(path)?,
        Some("parquet") => load_parquet(path)?,
        _ => return Err(Error::UnsupportedFile(path.to_path_buf())),
    };
    log::debug!("loaded {} rows from {}", df.height(), path.display());
    Ok(df)
}
