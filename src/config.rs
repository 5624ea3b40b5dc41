use std::env;

/// Runtime configuration, read once at startup. Everything that changes
/// behavior is optional: no `DATABASE_URL` means the JSON document backend,
/// no `EDIT_PASSWORD` means the board stays view-only.
#[derive(Clone)]
pub struct Config {
    /// Connection string for the relational backend (a SQLite database
    /// path). Presence selects the relational store.
    pub database_url: Option<String>,
    /// Shared secret gating mutation.
    pub edit_password: Option<String>,
    /// Directory holding the JSON board document.
    pub data_dir: String,
    pub frontend_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            edit_password: env::var("EDIT_PASSWORD").ok().filter(|v| !v.is_empty()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}
