use crate::{
    filter::ProjectionFilter,
    schema::{self, stat_column},
    ClassYear, Percentile, Position, Result,
};
use derive_deref::Deref;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Pitcher leaderboard request. Innings gate the rows; batters faced is the
/// denominator for every derived rate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PitcherQuery {
    pub min_ip: f64,
    pub conferences: Option<Vec<String>>,
    pub positions: Option<Vec<Position>>,
    pub years: Option<Vec<ClassYear>>,
    pub team: Option<String>,
    pub name: String,
    pub percentile: Option<Percentile>,
}

impl PitcherQuery {
    fn filter(&self) -> ProjectionFilter {
        let mut filter = ProjectionFilter::new()
            .min_volume(schema::IP, self.min_ip)
            .name_contains(&self.name);
        if let Some(conferences) = &self.conferences {
            filter = filter.conferences(conferences);
        }
        if let Some(positions) = &self.positions {
            filter = filter.positions(positions);
        }
        if let Some(years) = &self.years {
            filter = filter.class_years(years);
        }
        if let Some(team) = &self.team {
            filter = filter.team(team);
        }
        filter
    }
}

#[derive(Clone, Deref)]
pub struct PitchersDf(DataFrame);

impl PitchersDf {
    pub fn new(df: DataFrame) -> Self {
        PitchersDf(df)
    }

    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let df = schema::normalize(crate::load_table(path)?)?;
        schema::check_counts(&df)?;
        log::info!("{} pitchers loaded", df.height());
        Ok(PitchersDf(df))
    }

    pub fn lazy(&self) -> LazyFrame {
        self.0.clone().lazy()
    }

    /// Filters, derives K%, BB%, K-BB% and HR% against BF, and sorts by FIP ascending.
    pub fn leaderboard(&self, query: &PitcherQuery) -> Result<DataFrame> {
        log::trace!("pitchers::leaderboard {:?}", query);
        let pct = query.percentile;
        let per_bf = |stat: &str| {
            col(&stat_column(stat, pct)).cast(DataType::Float64)
                / col(schema::BF).cast(DataType::Float64)
        };

        let mut select: Vec<Expr> = schema::ID_COLUMNS.iter().map(|name| col(name)).collect();
        select.extend([
            col(schema::IP),
            col(schema::BF),
            col(&stat_column("FIP", pct)).alias("FIP"),
            col(&stat_column("ERA", pct)).alias("ERA"),
            cols(["K%", "BB%", "K-BB%", "HR%"]),
        ]);

        let df = self
            .lazy()
            .filter(query.filter().build())
            .with_columns([
                per_bf("K").alias("K%"),
                per_bf("BB").alias("BB%"),
                per_bf("HR").alias("HR%"),
            ])
            .with_column((col("K%") - col("BB%")).alias("K-BB%"))
            .select(select)
            .sort(
                ["FIP"],
                SortMultipleOptions::default()
                    .with_nulls_last(true)
                    .with_maintain_order(true),
            )
            .collect()?;

        log::debug!("{} of {} pitchers on leaderboard", df.height(), self.height());
        Ok(df)
    }
}
