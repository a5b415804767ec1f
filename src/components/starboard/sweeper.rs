//! Suppression périodique des suivis expirés.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::{log_error, log_info};
use super::{store::StarboardStore, votes::vote_window};

pub const SWEEP_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

/// Supprime, sur chaque serveur connu, les suivis plus vieux que la fenêtre de vote.
/// Retourne le nombre total de lignes supprimées.
pub async fn sweep(store: &StarboardStore, now: DateTime<Utc>) -> u64 {
    let expiration = now - vote_window();
    let mut deleted = 0;
    for guild in store.guilds().await {
        match store.purge_before(guild, expiration).await {
            Ok(count) => deleted += count,
            Err(e) => log_error!("Starboard: nettoyage du serveur {} impossible: {}", guild, e),
        }
    }
    deleted
}

/// Tâche de fond lancée au démarrage, arrêtée quand elle est détruite.
pub struct Sweeper {
    handle: JoinHandle<()>,
}

impl Sweeper {
    pub fn start(store: Arc<StarboardStore>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let deleted = sweep(&store, Utc::now()).await;
                log_info!("Suppression des messages expirés Starboard effectuée ({} supprimé(s))", deleted);
            }
        });
        Self { handle }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;
    use serenity::model::id::{GuildId, MessageId};
    use super::*;
    use crate::components::starboard::votes::{tests::*, VoteHandler, Outcome};

    #[tokio::test]
    async fn expired_rows_start_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = configured_store(dir.path(), 10).await;
        let handler = VoteHandler::new(store.clone());
        let gateway = FakeGateway::default();
        let now = Utc::now();
        let then = now - ChronoDuration::hours(25);
        // Le message est récent, mais son suivi a été créé il y a 25 heures
        gateway.add_message(100, now - ChronoDuration::minutes(5)).await;
        for user in 1..=5 {
            handler.handle(&gateway, &star(100, user), then).await.unwrap();
        }
        assert_eq!(store.tracked(GUILD, MessageId(100)).await.unwrap().unwrap().vote_count(), 5);

        assert_eq!(sweep(&store, now).await, 1);
        assert!(store.tracked(GUILD, MessageId(100)).await.unwrap().is_none());
        assert_eq!(sweep(&store, now).await, 0);

        let outcome = handler.handle(&gateway, &star(100, 6), now).await.unwrap();
        assert_eq!(outcome, Outcome::Tracked { votes: 1 });
    }

    #[tokio::test]
    async fn sweeps_every_known_guild() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(StarboardStore::new(dir.path()));
        let now = Utc::now();
        for guild in [GuildId(1), GuildId(2)] {
            store.track(guild, MessageId(1), now - ChronoDuration::days(2)).await.unwrap();
            store.track(guild, MessageId(2), now).await.unwrap();
        }
        assert_eq!(sweep(&store, now).await, 2);
    }

    #[tokio::test]
    async fn task_runs_immediately_and_stops_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(StarboardStore::new(dir.path()));
        store.track(GuildId(1), MessageId(1), Utc::now() - ChronoDuration::days(2)).await.unwrap();

        let sweeper = Sweeper::start(store.clone(), SWEEP_INTERVAL);
        for _ in 0..50 {
            if store.tracked(GuildId(1), MessageId(1)).await.unwrap().is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(store.tracked(GuildId(1), MessageId(1)).await.unwrap().is_none());
        // La tâche garde une référence vers le stockage tant qu'elle tourne
        assert_eq!(Arc::strong_count(&store), 2);

        drop(sweeper);
        for _ in 0..50 {
            if Arc::strong_count(&store) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(Arc::strong_count(&store), 1);
    }
}
