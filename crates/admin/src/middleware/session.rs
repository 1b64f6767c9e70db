//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The app runs
//! inside the Shopify admin iframe, so the cookie is `SameSite=None` and
//! therefore always `Secure`.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "pc_admin_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// # Panics
///
/// Panics if the schema name or table name is invalid (should never happen
/// with hardcoded "configurator" and "session" values).
#[must_use]
pub fn create_session_layer(pool: &PgPool) -> SessionManagerLayer<PostgresStore> {
    // The session table is created by the configurator schema migration.
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("configurator")
        .expect("valid schema name")
        .with_table_name("session")
        .expect("valid table name");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(true)
        .with_same_site(tower_sessions::cookie::SameSite::None)
        .with_http_only(true)
        .with_path("/")
}
