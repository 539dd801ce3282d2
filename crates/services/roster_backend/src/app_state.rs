// --- File: crates/services/roster_backend/src/app_state.rs ---
use roster_db::DbClient;

/// State shared by the application-level routes (`/` and `/health`).
///
/// Record routes carry their own services; this only keeps what the
/// process as a whole needs.
#[derive(Clone)]
pub struct AppState {
    /// The database connection, absent when records are kept in memory.
    pub db_client: Option<DbClient>,
}

impl AppState {
    pub fn new(db_client: Option<DbClient>) -> Self {
        Self { db_client }
    }

    /// Close the database pool, if there is one.
    pub async fn shutdown(&self) {
        if let Some(db_client) = &self.db_client {
            db_client.close().await;
        }
    }
}
