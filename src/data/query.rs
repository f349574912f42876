//! SQL Query Module
//! Runs ad-hoc SQL against the loaded DataFrame through polars-sql.

use polars::prelude::*;
use polars::sql::SQLContext;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Query is empty")]
    EmptyQuery,
    #[error("{0}")]
    Execution(String),
}

impl From<PolarsError> for QueryError {
    fn from(e: PolarsError) -> Self {
        QueryError::Execution(e.to_string())
    }
}

/// Executes SQL statements with the dataset registered as a table.
pub struct QueryRunner;

impl QueryRunner {
    /// Run `sql` with `df` registered under `table_name`.
    pub fn run(df: &DataFrame, table_name: &str, sql: &str) -> Result<DataFrame, QueryError> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let mut ctx = SQLContext::new();
        ctx.register(table_name, df.clone().lazy());

        let result = ctx.execute(sql)?.collect()?;
        tracing::debug!(
            rows = result.height(),
            columns = result.width(),
            "query executed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df! {
            "city" => ["oslo", "rome", "oslo", "lima", "rome", "oslo", "lima", "rome"],
            "temp" => [3.0, 18.5, 5.0, 21.0, 16.0, 1.5, 22.5, 19.0],
            "day" => [1i64, 1, 2, 2, 3, 3, 4, 4],
        }
        .unwrap()
    }

    #[test]
    fn default_query_limits_rows() {
        let result = QueryRunner::run(&sample_df(), "data", "SELECT * FROM data LIMIT 5").unwrap();
        assert_eq!(result.height(), 5);
        assert_eq!(result.width(), 3);
    }

    #[test]
    fn filters_and_projects() {
        let result = QueryRunner::run(
            &sample_df(),
            "data",
            "SELECT day, temp FROM data WHERE city = 'oslo' ORDER BY day",
        )
        .unwrap();

        let names: Vec<String> = result
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["day", "temp"]);
        let days: Vec<Option<i64>> = result
            .column("day")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(days, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn aggregates_by_group() {
        let result = QueryRunner::run(
            &sample_df(),
            "data",
            "SELECT city, COUNT(*) AS n FROM data GROUP BY city ORDER BY city",
        )
        .unwrap();

        assert_eq!(result.height(), 3);
        let cities: Vec<Option<&str>> = result
            .column("city")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(cities, vec![Some("lima"), Some("oslo"), Some("rome")]);
    }

    #[test]
    fn custom_table_name() {
        let result = QueryRunner::run(&sample_df(), "weather", "SELECT * FROM weather").unwrap();
        assert_eq!(result.height(), 8);
    }

    #[test]
    fn blank_query_is_rejected() {
        assert!(matches!(
            QueryRunner::run(&sample_df(), "data", "   \n"),
            Err(QueryError::EmptyQuery)
        ));
    }

    #[test]
    fn invalid_sql_reports_message() {
        let err = QueryRunner::run(&sample_df(), "data", "SELEC nonsense").unwrap_err();
        assert!(matches!(err, QueryError::Execution(ref msg) if !msg.is_empty()));
    }

    #[test]
    fn unknown_table_is_an_error() {
        assert!(QueryRunner::run(&sample_df(), "data", "SELECT * FROM other").is_err());
    }
}
