pub mod starboard;

use std::fmt;

#[derive(Debug)]
pub enum Error {
    SeaORM(sea_orm::DbErr),
    Serde(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SeaORM(e) => write!(f, "base de données: {}", e),
            Error::Serde(e) => write!(f, "sérialisation: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<sea_orm::DbErr> for Error {
    fn from(e: sea_orm::DbErr) -> Self {
        Error::SeaORM(e)
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serde(e)
    }
}
