//! Database seeding
//!
//! One parameterized bulk insert per request. Rows arrive as JSON objects;
//! the column list comes from the first row and every other row must match
//! it exactly — a mismatch is rejected up front rather than silently
//! dropping or null-filling columns.

use std::time::Duration;

use serde_json::{Map, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use crate::error::AgentError;

/// Handle on one PostgreSQL database.
pub struct DatabaseSeeder {
    pool: PgPool,
}

impl DatabaseSeeder {
    /// Connects and verifies the connection with a trivial query.
    pub async fn connect(url: &str) -> Result<Self, AgentError> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await?;
        sqlx::query("SELECT 1").execute(&pool).await?;

        info!("Database connection established");
        Ok(Self { pool })
    }

    /// Inserts the rows into `table` with a single statement.
    ///
    /// An empty row-set is a trivial success: zero statements executed.
    pub async fn seed(&self, table: &str, rows: &[Map<String, Value>]) -> Result<u64, AgentError> {
        if rows.is_empty() {
            info!(table, "No rows to seed");
            return Ok(0);
        }

        let mut builder = build_insert(table, rows)?;
        let result = builder.build().execute(&self.pool).await?;

        info!(table, rows = result.rows_affected(), "Rows inserted");
        Ok(result.rows_affected())
    }
}

/// Interprets a JSON payload as a uniform row-set.
pub fn as_row_set(value: &Value) -> Result<Vec<Map<String, Value>>, AgentError> {
    let items = value
        .as_array()
        .ok_or_else(|| AgentError::PayloadFormat("row data must be a list of objects".into()))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_object().cloned().ok_or_else(|| {
                AgentError::PayloadFormat(format!("row {i} is not an object"))
            })
        })
        .collect()
}

/// Builds the parameterized insert for a non-empty, homogeneous row-set.
pub(crate) fn build_insert(
    table: &str,
    rows: &[Map<String, Value>],
) -> Result<QueryBuilder<'static, Postgres>, AgentError> {
    if !is_identifier(table) {
        return Err(AgentError::PayloadFormat(format!(
            "invalid table name: {table}"
        )));
    }

    let columns: Vec<String> = rows[0].keys().cloned().collect();
    for column in &columns {
        if !is_identifier(column) {
            return Err(AgentError::PayloadFormat(format!(
                "invalid column name: {column}"
            )));
        }
    }
    for (i, row) in rows.iter().enumerate().skip(1) {
        if row.len() != columns.len() || !columns.iter().all(|c| row.contains_key(c)) {
            return Err(AgentError::PayloadFormat(format!(
                "row {i} does not match the columns of the first row"
            )));
        }
    }

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("INSERT INTO {} ({}) ", table, columns.join(", ")));
    builder.push_values(rows, |mut tuple, row| {
        for column in &columns {
            match row.get(column) {
                None | Some(Value::Null) => {
                    tuple.push_bind(None::<String>);
                }
                Some(Value::Bool(v)) => {
                    tuple.push_bind(*v);
                }
                Some(Value::Number(n)) => {
                    if let Some(i) = n.as_i64() {
                        tuple.push_bind(i);
                    } else if let Some(f) = n.as_f64() {
                        tuple.push_bind(f);
                    } else {
                        tuple.push_bind(n.to_string());
                    }
                }
                Some(Value::String(s)) => {
                    tuple.push_bind(s.clone());
                }
                Some(nested @ (Value::Array(_) | Value::Object(_))) => {
                    tuple.push_bind(sqlx::types::Json(nested.clone()));
                }
            }
        }
    });

    Ok(builder)
}

/// Table and column names are interpolated into the statement text, so
/// only plain SQL identifiers are accepted.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Map<String, Value>> {
        as_row_set(&value).unwrap()
    }

    #[test]
    fn test_single_row_builds_one_parameterized_statement() {
        let rows = rows(json!([{"name": "Alice"}]));

        let builder = build_insert("users", &rows).unwrap();
        assert_eq!(builder.sql(), "INSERT INTO users (name) VALUES ($1)");
    }

    #[test]
    fn test_multi_row_multi_column_statement() {
        let rows = rows(json!([
            {"name": "Alice", "role": "Admin"},
            {"name": "Bob", "role": "User"}
        ]));

        let builder = build_insert("users", &rows).unwrap();
        assert_eq!(
            builder.sql(),
            "INSERT INTO users (name, role) VALUES ($1, $2), ($3, $4)"
        );
    }

    #[test]
    fn test_heterogeneous_rows_are_rejected() {
        let rows = rows(json!([
            {"name": "Alice", "role": "Admin"},
            {"name": "Bob"}
        ]));

        let err = match build_insert("users", &rows) {
            Err(e) => e,
            Ok(_) => panic!("expected heterogeneous rows to be rejected"),
        };
        assert!(matches!(err, AgentError::PayloadFormat(_)));

        let rows = rows_with_extra_key();
        let err = match build_insert("users", &rows) {
            Err(e) => e,
            Ok(_) => panic!("expected extra-key rows to be rejected"),
        };
        assert!(matches!(err, AgentError::PayloadFormat(_)));
    }

    fn rows_with_extra_key() -> Vec<Map<String, Value>> {
        rows(json!([
            {"name": "Alice"},
            {"name": "Bob", "role": "User"}
        ]))
    }

    #[test]
    fn test_suspicious_identifiers_are_rejected() {
        let data = rows(json!([{"name": "Alice"}]));
        assert!(build_insert("users; DROP TABLE users", &data).is_err());
        assert!(build_insert("2users", &data).is_err());

        let bad_column = rows(json!([{"name\" )": "Alice"}]));
        assert!(build_insert("users", &bad_column).is_err());
    }

    #[test]
    fn test_as_row_set_rejects_non_lists() {
        assert!(as_row_set(&json!({"name": "Alice"})).is_err());
        assert!(as_row_set(&json!([1, 2, 3])).is_err());
        assert!(as_row_set(&json!([])).unwrap().is_empty());
    }
}
