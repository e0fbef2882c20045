use anyhow::{bail, Result};
use cbp::{
    filter::filter_sql, schema, ClassYear, HitterQuery, HittersDf, Percentile, PitcherQuery,
    PitchersDf, Position,
};
use clap::{Parser, Subcommand, ValueEnum};
use itertools::Itertools;
use log::LevelFilter;
use polars::prelude::*;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "College baseball projection leaderboards")]
struct Args {
    #[command(subcommand)]
    board: Board,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Board {
    /// Hitters sorted by wOBA
    Hitters {
        #[command(flatten)]
        common: Common,

        #[arg(long = "min-pa", default_value_t = 100)]
        min_pa: u32,
    },
    /// Pitchers sorted by FIP
    Pitchers {
        #[command(flatten)]
        common: Common,

        #[arg(long = "min-ip", default_value_t = 20.0)]
        min_ip: f64,
    },
    /// Hitters aggregated by team
    Teams {
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: PathBuf,

        #[arg(short = 'p', long = "percentile", value_parser = parse_percentile)]
        percentile: Option<Percentile>,

        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
}

#[derive(clap::Args, Debug)]
struct Common {
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: PathBuf,

    /// Projection percentile (5, 25, 50, 75, 95); defaults to 50 for percentile files
    #[arg(short = 'p', long = "percentile", value_parser = parse_percentile)]
    percentile: Option<Percentile>,

    /// Repeatable; omit to include every conference
    #[arg(short = 'c', long = "conference")]
    conferences: Vec<String>,

    #[arg(long = "position", value_parser = parse_position)]
    positions: Vec<Position>,

    #[arg(long = "year", value_parser = parse_year)]
    years: Vec<ClassYear>,

    #[arg(short = 't', long = "team")]
    team: Option<String>,

    /// Case-insensitive name search
    #[arg(short = 'n', long = "name", default_value = "")]
    name: String,

    /// SQL predicate applied before the leaderboard, e.g. "team = 'LSU'"
    #[arg(long = "where")]
    predicate: Option<String>,

    #[arg(long)]
    limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Csv,
}

fn parse_percentile(s: &str) -> std::result::Result<Percentile, String> {
    s.trim_start_matches(['p', 'P'])
        .parse()
        .map_err(|_| format!("expected one of {}", Percentile::ALL.iter().join(", ")))
}

fn parse_position(s: &str) -> std::result::Result<Position, String> {
    s.to_uppercase()
        .parse()
        .map_err(|_| format!("unknown position '{}'", s))
}

fn parse_year(s: &str) -> std::result::Result<ClassYear, String> {
    let mut chars = s.chars();
    let normalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    };
    normalized
        .parse()
        .map_err(|_| format!("unknown class year '{}' (Fr, So, Jr, Sr)", s))
}

fn non_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
    (!values.is_empty()).then(|| values.to_vec())
}

// Point-value files have no percentile columns to pick from
fn resolve_percentile(
    df: &DataFrame,
    requested: Option<Percentile>,
    file: &Path,
) -> Result<Option<Percentile>> {
    match (schema::has_percentiles(df), requested) {
        (true, pct) => Ok(Some(pct.unwrap_or_default())),
        (false, None) => Ok(None),
        (false, Some(pct)) => bail!(
            "--percentile {} given but {} has point-value columns only",
            pct,
            file.display()
        ),
    }
}

// Boards print in full; --limit is the only thing that shortens them
fn lift_display_limits() {
    std::env::set_var("POLARS_FMT_MAX_ROWS", "-1");
    std::env::set_var("POLARS_FMT_MAX_COLS", "-1");
    std::env::set_var("POLARS_TABLE_WIDTH", "65535");
}

impl Common {
    fn prefilter(&self, df: &DataFrame) -> Result<DataFrame> {
        match &self.predicate {
            Some(predicate) => Ok(filter_sql(df.clone().lazy(), predicate)?.collect()?),
            None => Ok(df.clone()),
        }
    }

    fn emit(&self, df: DataFrame) -> Result<()> {
        let df = match self.limit {
            Some(n) => df.head(Some(n)),
            None => df,
        };
        emit(df, self.format)
    }
}

fn emit(mut df: DataFrame, format: Format) -> Result<()> {
    match format {
        Format::Table => println!("{}", df),
        Format::Csv => CsvWriter::new(std::io::stdout()).finish(&mut df)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    lift_display_limits();

    // Set the default level based on verbosity
    let default_level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let config = ConfigBuilder::new().add_filter_allow_str("cbp").build();

    TermLogger::init(
        default_level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    log::trace!("Args {:#?}", args);

    match args.board {
        Board::Hitters { common, min_pa } => {
            let hitters = HittersDf::load(&common.file)?;
            let query = HitterQuery {
                min_pa,
                conferences: non_empty(&common.conferences),
                positions: non_empty(&common.positions),
                years: non_empty(&common.years),
                team: common.team.clone(),
                name: common.name.clone(),
                percentile: resolve_percentile(&hitters, common.percentile, &common.file)?,
            };
            let hitters = HittersDf::new(common.prefilter(&hitters)?);
            let board = hitters.leaderboard(&query)?;
            log::info!("{} hitters match", board.height());
            common.emit(board)?;
        }
        Board::Pitchers { common, min_ip } => {
            if min_ip < 0.0 {
                bail!("--min-ip must be non-negative");
            }
            let pitchers = PitchersDf::load(&common.file)?;
            let query = PitcherQuery {
                min_ip,
                conferences: non_empty(&common.conferences),
                positions: non_empty(&common.positions),
                years: non_empty(&common.years),
                team: common.team.clone(),
                name: common.name.clone(),
                percentile: resolve_percentile(&pitchers, common.percentile, &common.file)?,
            };
            let pitchers = PitchersDf::new(common.prefilter(&pitchers)?);
            let board = pitchers.leaderboard(&query)?;
            log::info!("{} pitchers match", board.height());
            common.emit(board)?;
        }
        Board::Teams {
            file,
            percentile,
            format,
        } => {
            let hitters = HittersDf::load(&file)?;
            let percentile = resolve_percentile(&hitters, percentile, &file)?;
            emit(hitters.team_stats(percentile)?, format)?;
        }
    }

    Ok(())
}
