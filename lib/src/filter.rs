use crate::{schema, ClassYear, Position, Result};
use polars::{prelude::*, sql::SQLContext};

/// Runs an ad-hoc SQL predicate against the projections, registered as `players`.
pub fn filter_sql(df: LazyFrame, predicate: &str) -> Result<LazyFrame> {
    let mut ctx = SQLContext::new();
    ctx.register("players", df);
    let query = format!("SELECT * FROM players WHERE {}", predicate);
    log::debug!("sql filter: {}", query);
    let df = ctx.execute(&query)?;
    Ok(df)
}

#[derive(Clone, Default)]
pub struct ProjectionFilter {
    filter_expr: Option<Expr>,
}

impl ProjectionFilter {
    pub fn new() -> Self {
        Self { filter_expr: None }
    }

    // Keeps rows whose volume stat (PA, IP, BF) is at least `min`
    pub fn min_volume(mut self, column: &str, min: f64) -> Self {
        let expr = col(column).cast(DataType::Float64).gt_eq(lit(min));
        self.extend_filter(expr)
    }

    // An empty set matches nothing
    pub fn conferences<S: AsRef<str>>(mut self, conferences: &[S]) -> Self {
        let expr = any_of(schema::CONFERENCE, conferences.iter().map(|c| c.as_ref().to_string()));
        self.extend_filter(expr)
    }

    pub fn positions(mut self, positions: &[Position]) -> Self {
        let expr = any_of(schema::POSITION, positions.iter().map(|p| p.to_string()));
        self.extend_filter(expr)
    }

    pub fn class_years(mut self, years: &[ClassYear]) -> Self {
        let expr = any_of(schema::YEAR, years.iter().map(|y| y.to_string()));
        self.extend_filter(expr)
    }

    pub fn team(mut self, team_name: &str) -> Self {
        let expr = col(schema::TEAM).eq(lit(team_name));
        self.extend_filter(expr)
    }

    // Case-insensitive substring match on the player name; empty matches all
    pub fn name_contains(mut self, needle: &str) -> Self {
        if needle.is_empty() {
            return self;
        }
        let expr = col(schema::PLAYER_NAME)
            .str()
            .to_lowercase()
            .str()
            .contains_literal(lit(needle.to_lowercase()));
        self.extend_filter(expr)
    }

    // Combines the current filter with a new one using AND logic
    fn extend_filter(&mut self, new_expr: Expr) -> Self {
        self.filter_expr = match self.filter_expr.take() {
            Some(existing_expr) => Some(existing_expr.and(new_expr)),
            None => Some(new_expr),
        };
        self.clone()
    }

    // Builds the final filter expression
    pub fn build(self) -> Expr {
        self.filter_expr.unwrap_or_else(|| lit(true))
    }
}

fn any_of<I: IntoIterator<Item = String>>(column: &str, values: I) -> Expr {
    values
        .into_iter()
        .map(|value| col(column).eq(lit(value)))
        .reduce(|acc, expr| acc.or(expr))
        .unwrap_or_else(|| lit(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> DataFrame {
        df!(
            "player_name" => ["Player A", "Player B", "Jack Smith", "Player D"],
            "position" => ["OF", "1B", "RHP", "OF"],
            "year" => ["Fr", "Jr", "Sr", "Jr"],
            "conference" => ["SEC", "ACC", "Big Ten", "SEC"],
            "team" => [Some("LSU"), Some("UNC"), Some("Minnesota"), None],
            "PA" => [450i64, 90, 0, 200],
        )
        .unwrap()
    }

    fn names(df: DataFrame, filter: ProjectionFilter) -> Vec<String> {
        df.lazy()
            .filter(filter.build())
            .collect()
            .unwrap()
            .column("player_name")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|name| name.unwrap().to_string())
            .collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        assert_eq!(names(players(), ProjectionFilter::new()).len(), 4);
    }

    #[test]
    fn min_volume_is_inclusive() {
        let filter = ProjectionFilter::new().min_volume("PA", 200.0);
        assert_eq!(names(players(), filter), ["Player A", "Player D"]);
    }

    #[test]
    fn conference_membership() {
        let filter = ProjectionFilter::new().conferences(&["ACC", "Big Ten"]);
        assert_eq!(names(players(), filter), ["Player B", "Jack Smith"]);
    }

    #[test]
    fn empty_conference_set_matches_nothing() {
        let none: [&str; 0] = [];
        let filter = ProjectionFilter::new().conferences(&none);
        assert!(names(players(), filter).is_empty());
    }

    #[test]
    fn name_search_ignores_case() {
        let filter = ProjectionFilter::new().name_contains("SMI");
        assert_eq!(names(players(), filter), ["Jack Smith"]);

        let filter = ProjectionFilter::new().name_contains("player");
        assert_eq!(names(players(), filter).len(), 3);

        let filter = ProjectionFilter::new().name_contains("");
        assert_eq!(names(players(), filter).len(), 4);
    }

    #[test]
    fn positions_and_years_combine_with_and() {
        let filter = ProjectionFilter::new()
            .positions(&[Position::Of, Position::FirstBase])
            .class_years(&[ClassYear::Jr]);
        assert_eq!(names(players(), filter), ["Player B", "Player D"]);
    }

    #[test]
    fn team_filter_drops_null_teams() {
        let filter = ProjectionFilter::new().team("LSU");
        assert_eq!(names(players(), filter), ["Player A"]);
    }

    #[test]
    fn sql_predicate() {
        let lf = filter_sql(players().lazy(), "PA >= 100 AND year = 'Jr'").unwrap();
        let df = lf.collect().unwrap();
        assert_eq!(df.height(), 1);
    }
}
