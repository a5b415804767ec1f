use std::fmt;

use serde_json::Value as JsonValue;
use serenity::http::HttpError;

use crate::db::controller;

#[derive(Debug)]
pub enum Error {
    Database(controller::Error),
    /// Erreur de la plateforme Discord (permission, HTTP...)
    Discord(serenity::Error),
    /// Le message (original, réponse ou copie) n'existe plus
    NotFound,
    /// Aucun salon Starboard configuré sur le serveur
    NotConfigured,
    InvalidSetting { name: &'static str, value: JsonValue },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Database(e) => write!(f, "Erreur de {}", e),
            Error::Discord(e) => write!(f, "Erreur Discord: {}", e),
            Error::NotFound => f.write_str("Message introuvable"),
            Error::NotConfigured => f.write_str("Channel Starboard non configuré"),
            Error::InvalidSetting { name, value } => write!(f, "Valeur invalide pour le paramètre {}: {}", name, value),
        }
    }
}

impl std::error::Error for Error {}

impl From<controller::Error> for Error {
    fn from(e: controller::Error) -> Self {
        Error::Database(e)
    }
}
impl From<sea_orm::DbErr> for Error {
    fn from(e: sea_orm::DbErr) -> Self {
        Error::Database(controller::Error::SeaORM(e))
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Database(controller::Error::Serde(e))
    }
}
impl From<serenity::Error> for Error {
    fn from(e: serenity::Error) -> Self {
        let status = match &e {
            serenity::Error::Http(http) => status_code(http),
            _ => None,
        };
        Error::from_discord(status, e)
    }
}

impl Error {
    /// Une réponse 404 de Discord signifie que le message n'existe plus.
    fn from_discord(status: Option<u16>, e: serenity::Error) -> Self {
        match status {
            Some(404) => Error::NotFound,
            _ => Error::Discord(e),
        }
    }
}

fn status_code(error: &HttpError) -> Option<u16> {
    match error {
        HttpError::UnsuccessfulRequest(resp) => Some(resp.status_code.as_u16()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discord_status() {
        assert!(matches!(Error::from_discord(Some(404), serenity::Error::Other("Unknown Message")), Error::NotFound));
        assert!(matches!(Error::from_discord(Some(403), serenity::Error::Other("Missing Access")), Error::Discord(_)));
        assert!(matches!(Error::from_discord(None, serenity::Error::Other("Timeout")), Error::Discord(_)));
    }

    #[test]
    fn non_http_errors_stay_discord_errors() {
        assert!(matches!(Error::from(serenity::Error::Other("Missing Permissions")), Error::Discord(_)));
    }
}
