use crate::{
    filter::ProjectionFilter,
    schema::{self, stat_column},
    ClassYear, Percentile, Position, Result,
};
use derive_deref::Deref;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Stats carried straight through to the leaderboard, in display order.
pub const HITTER_STATS: [&str; 9] = ["wOBA", "BA", "OBP", "SLG", "1B", "2B", "3B", "HR", "HBP"];

/// One leaderboard request. `conferences: None` places no constraint on
/// conference, while `Some` of an empty list matches no rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HitterQuery {
    pub min_pa: u32,
    pub conferences: Option<Vec<String>>,
    pub positions: Option<Vec<Position>>,
    pub years: Option<Vec<ClassYear>>,
    pub team: Option<String>,
    pub name: String,
    /// `None` reads point-value columns instead of `{stat}_p{q}`.
    pub percentile: Option<Percentile>,
}

impl HitterQuery {
    fn filter(&self) -> ProjectionFilter {
        let mut filter = ProjectionFilter::new()
            .min_volume(schema::PA, f64::from(self.min_pa))
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
pub struct HittersDf(DataFrame);

impl HittersDf {
    pub fn new(df: DataFrame) -> Self {
        HittersDf(df)
    }

    /// Loads, normalises and validates a hitter projections file.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let df = schema::normalize(crate::load_table(path)?)?;
        schema::check_counts(&df)?;
        log::info!("{} hitters loaded", df.height());
        Ok(HittersDf(df))
    }

    pub fn lazy(&self) -> LazyFrame {
        self.0.clone().lazy()
    }

    /// Filters, derives BB% and K% against PA, and sorts by wOBA descending.
    pub fn leaderboard(&self, query: &HitterQuery) -> Result<DataFrame> {
        log::trace!("hitters::leaderboard {:?}", query);
        let pct = query.percentile;
        let pa = col(schema::PA).cast(DataType::Float64);

        let mut select: Vec<Expr> = schema::ID_COLUMNS.iter().map(|name| col(name)).collect();
        select.push(col(schema::PA));
        select.extend(
            HITTER_STATS
                .iter()
                .map(|stat| col(&stat_column(stat, pct)).alias(stat)),
        );
        select.push(col("BB%"));
        select.push(col("K%"));

        let df = self
            .lazy()
            .filter(query.filter().build())
            .with_columns([
                (col(&stat_column("BB", pct)).cast(DataType::Float64) / pa.clone()).alias("BB%"),
                (col(&stat_column("K", pct)).cast(DataType::Float64) / pa).alias("K%"),
            ])
            .select(select)
            .sort(
                ["wOBA"],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_nulls_last(true)
                    .with_maintain_order(true),
            )
            .collect()?;

        log::debug!("{} of {} hitters on leaderboard", df.height(), self.height());
        Ok(df)
    }

    /// Aggregates hitters per team: PA and HR summed, rate stats averaged.
    /// Hitters without a team are left out.
    pub fn team_stats(&self, percentile: Option<Percentile>) -> Result<DataFrame> {
        log::trace!("hitters::team_stats");
        let mean = |stat: &str| col(&stat_column(stat, percentile)).mean().alias(stat);

        let df = self
            .lazy()
            .filter(col(schema::TEAM).is_not_null())
            .group_by([col(schema::TEAM)])
            .agg([
                col(schema::PA).sum(),
                mean("wOBA"),
                mean("BA"),
                mean("OBP"),
                mean("SLG"),
                col(&stat_column("HR", percentile)).sum().alias("HR"),
            ])
            .rename([schema::TEAM], ["Team"])
            .select([cols(["Team", "PA", "wOBA", "BA", "OBP", "SLG", "HR"])])
            .sort(
                ["wOBA"],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_nulls_last(true),
            )
            .collect()?;

        log::debug!("{} teams with hitters", df.height());
        Ok(df)
    }
}
