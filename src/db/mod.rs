//! Accès aux bases de données SQLite des composants.

pub mod model;
pub mod controller;

use std::path::Path;
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Type des identifiants Discord dans les tables
pub type IDType = i64;

/// Ouvre la base SQLite `path`, en la créant (dossiers compris) si elle n'existe pas.
pub async fn open_sqlite(path: &Path) -> Result<DbConn, DbErr> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await
            .map_err(|e| DbErr::Custom(format!("Impossible de créer le dossier {}: {}", parent.to_string_lossy(), e)))?;
    }
    let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.to_string_lossy()));
    options.sqlx_logging(false);
    Database::connect(options).await
}
