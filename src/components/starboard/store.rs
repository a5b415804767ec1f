//! Stockage du starboard : une base SQLite par serveur, `<data_dir>/starboard/g<id>.db`.
//!
//! Les connexions sont ouvertes au premier accès puis gardées pour la durée du bot.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use sea_orm::DbConn;
use serde_json::Value as JsonValue;
use serenity::model::id::{GuildId, MessageId};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::{db::{self, controller::starboard as ctrl, IDType}, log_info};
use super::{
    model::{to_unix, TrackedMessage},
    settings::{self, GuildSettings},
    Error,
};

pub struct StarboardStore {
    root: PathBuf,
    connections: RwLock<HashMap<GuildId, Arc<DbConn>>>,
    locks: Mutex<HashMap<GuildId, Arc<Mutex<()>>>>,
}

impl StarboardStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            root: data_dir.as_ref().join("starboard"),
            connections: RwLock::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }
    pub fn database_path(&self, guild: GuildId) -> PathBuf {
        self.root.join(format!("g{}.db", guild.0))
    }
    async fn connection(&self, guild: GuildId) -> Result<Arc<DbConn>, Error> {
        if let Some(db) = self.connections.read().await.get(&guild) {
            return Ok(Arc::clone(db));
        }
        let path = self.database_path(guild);
        let db = db::open_sqlite(&path).await?;
        ctrl::init(&db, &settings::defaults()).await?;
        let mut connections = self.connections.write().await;
        let db = connections.entry(guild).or_insert_with(|| {
            log_info!("Base Starboard ouverte: {}", path.to_string_lossy());
            Arc::new(db)
        });
        Ok(Arc::clone(db))
    }
    /// Crée les tables du serveur et insère les paramètres par défaut manquants.
    pub async fn init_guild(&self, guild: GuildId) -> Result<(), Error> {
        self.connection(guild).await?;
        Ok(())
    }
    /// Serveurs dont la base a été ouverte
    pub async fn guilds(&self) -> Vec<GuildId> {
        let mut guilds: Vec<_> = self.connections.read().await.keys().copied().collect();
        guilds.sort();
        guilds
    }
    /// Verrou de sérialisation des votes d'un serveur.
    pub async fn lock_guild(&self, guild: GuildId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(guild).or_default())
        };
        lock.lock_owned().await
    }

    pub async fn settings(&self, guild: GuildId) -> Result<BTreeMap<String, JsonValue>, Error> {
        let db = self.connection(guild).await?;
        Ok(ctrl::get_settings(&db).await?)
    }
    pub async fn guild_settings(&self, guild: GuildId) -> Result<GuildSettings, Error> {
        GuildSettings::from_raw(&self.settings(guild).await?)
    }
    pub async fn set_settings(&self, guild: GuildId, update: &BTreeMap<String, JsonValue>) -> Result<(), Error> {
        let db = self.connection(guild).await?;
        Ok(ctrl::set_settings(&db, update).await?)
    }

    pub async fn tracked(&self, guild: GuildId, message: MessageId) -> Result<Option<TrackedMessage>, Error> {
        let db = self.connection(guild).await?;
        match ctrl::get_message(&db, message.0 as IDType).await? {
            Some(row) => Ok(Some(TrackedMessage::try_from(row)?)),
            None => Ok(None),
        }
    }
    /// Retourne le suivi du message, en le créant au besoin à la date `now`.
    pub async fn track(&self, guild: GuildId, message: MessageId, now: DateTime<Utc>) -> Result<TrackedMessage, Error> {
        let db = self.connection(guild).await?;
        let row = ctrl::track_message(&db, message.0 as IDType, to_unix(now)).await?;
        Ok(TrackedMessage::try_from(row)?)
    }
    pub async fn save_votes(&self, guild: GuildId, tracked: &TrackedMessage) -> Result<(), Error> {
        let db = self.connection(guild).await?;
        Ok(ctrl::set_votes(&db, tracked.message_id.0 as IDType, &tracked.voter_ids()).await?)
    }
    pub async fn set_mirror(&self, guild: GuildId, message: MessageId, mirror: MessageId) -> Result<(), Error> {
        let db = self.connection(guild).await?;
        Ok(ctrl::set_embed_message(&db, message.0 as IDType, mirror.0 as IDType).await?)
    }
    pub async fn forget(&self, guild: GuildId, message: MessageId) -> Result<(), Error> {
        let db = self.connection(guild).await?;
        Ok(ctrl::delete_message(&db, message.0 as IDType).await?)
    }
    /// Supprime les suivis commencés avant `expiration`.
    pub async fn purge_before(&self, guild: GuildId, expiration: DateTime<Utc>) -> Result<u64, Error> {
        let db = self.connection(guild).await?;
        Ok(ctrl::delete_expired(&db, to_unix(expiration)).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serenity::model::id::UserId;
    use super::*;

    const GUILD: GuildId = GuildId(1000);

    #[tokio::test]
    async fn seeds_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = StarboardStore::new(dir.path());
        store.init_guild(GUILD).await.unwrap();
        assert!(store.database_path(GUILD).ends_with("starboard/g1000.db"));
        assert!(store.database_path(GUILD).exists());

        let mut update = BTreeMap::new();
        update.insert("PostTarget".to_string(), JsonValue::from(3));
        store.set_settings(GUILD, &update).await.unwrap();
        store.init_guild(GUILD).await.unwrap();

        let settings = store.settings(GUILD).await.unwrap();
        assert_eq!(settings.len(), 4);
        assert_eq!(settings["PostTarget"], JsonValue::from(3));
        assert_eq!(settings["PostChannelID"], JsonValue::from(0));
        assert_eq!(settings["DetectPotentialPost"], JsonValue::from(true));
        assert_eq!(store.guilds().await, vec![GUILD]);
    }

    #[tokio::test]
    async fn guilds_open_independently() {
        let dir = tempfile::tempdir().unwrap();
        let store = StarboardStore::new(dir.path());
        let other = GuildId(2000);

        let (a, c) = tokio::join!(store.connection(GUILD), store.connection(other));
        let (a, c) = (a.unwrap(), c.unwrap());
        assert!(!Arc::ptr_eq(&a, &c));
        assert!(Arc::ptr_eq(&a, &store.connection(GUILD).await.unwrap()));
        assert_eq!(store.guilds().await, vec![GUILD, other]);
        assert_eq!(store.settings(GUILD).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn unknown_setting_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = StarboardStore::new(dir.path());
        let mut update = BTreeMap::new();
        update.insert("Inconnu".to_string(), JsonValue::from(1));
        store.set_settings(GUILD, &update).await.unwrap();
        assert!(!store.settings(GUILD).await.unwrap().contains_key("Inconnu"));
    }

    #[tokio::test]
    async fn tracking_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = StarboardStore::new(dir.path());
        let now = Utc::now();
        let msg = MessageId(55);

        assert_eq!(store.tracked(GUILD, msg).await.unwrap(), None);
        let mut tracked = store.track(GUILD, msg, now).await.unwrap();
        assert!(tracked.votes.is_empty());
        assert_eq!(tracked.mirror, None);

        tracked.add_vote(UserId(1));
        tracked.add_vote(UserId(2));
        store.save_votes(GUILD, &tracked).await.unwrap();
        store.set_mirror(GUILD, msg, MessageId(77)).await.unwrap();

        // Un second suivi ne remplace pas la ligne existante
        let again = store.track(GUILD, msg, now + Duration::hours(1)).await.unwrap();
        assert_eq!(again.votes, vec![UserId(1), UserId(2)]);
        assert_eq!(again.mirror, Some(MessageId(77)));
        assert_eq!(again.created_at.timestamp_millis(), now.timestamp_millis());

        store.forget(GUILD, msg).await.unwrap();
        assert_eq!(store.tracked(GUILD, msg).await.unwrap(), None);
    }

    #[tokio::test]
    async fn purge_expired_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = StarboardStore::new(dir.path());
        let now = Utc::now();
        store.track(GUILD, MessageId(1), now - Duration::hours(25)).await.unwrap();
        store.track(GUILD, MessageId(2), now - Duration::hours(2)).await.unwrap();

        let expiration = now - Duration::hours(24);
        assert_eq!(store.purge_before(GUILD, expiration).await.unwrap(), 1);
        assert_eq!(store.purge_before(GUILD, expiration).await.unwrap(), 0);
        assert!(store.tracked(GUILD, MessageId(1)).await.unwrap().is_none());
        assert!(store.tracked(GUILD, MessageId(2)).await.unwrap().is_some());
    }
}
