//! Database seeding API
//!
//! Contains the /db/seed endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::middleware::RequireApiKey;
use crate::services::database::{as_row_set, DatabaseSeeder};
use crate::state::AppState;

/// Seeding request.
#[derive(Debug, Deserialize)]
pub struct SeedRequest {
    pub table_name: String,
    /// List of uniform objects; all rows must share the first row's keys.
    pub rows: Value,
    /// Overrides DB_URL for this invocation.
    pub db_url_override: Option<String>,
}

/// Creates the database routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/db/seed", post(seed_database))
}

/// Inserts rows into a table with one parameterized statement.
///
/// POST /db/seed
/// Requires API key.
async fn seed_database(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    Json(request): Json<SeedRequest>,
) -> String {
    let url = match state
        .config
        .database
        .resolve(request.db_url_override.as_deref())
    {
        Ok(url) => url,
        Err(e) => return e.to_string(),
    };

    let rows = match as_row_set(&request.rows) {
        Ok(rows) => rows,
        Err(e) => return e.to_string(),
    };

    let seeder = match DatabaseSeeder::connect(&url).await {
        Ok(seeder) => seeder,
        Err(e) => return format!("Database connection failed: {e}"),
    };

    match seeder.seed(&request.table_name, &rows).await {
        Ok(count) => format!(
            "Successfully inserted {count} rows into {}.",
            request.table_name
        ),
        Err(e) => format!("Database error: {e}"),
    }
}
