//! Core de l'application.
//! L'initialisation du bot et la gestion des composants se fait dans ce module.

use std::sync::Arc;

use nero_core::{container::RefContainer, ComponentContainer};
use serenity::{Client, prelude::GatewayIntents};
use tokio::sync::RwLock;

use crate::{components as cmp, config::Config, log_error, log_info};

type Result<T> = serenity::Result<T>;

/// Structure du bot.
///
/// Il s'agit de la classe mère de l'application.
///
/// Le bot est composé de plusieurs composants qui sont créés et placés dans un [ComponentContainer].
/// Le conteneur retourne au client du bot un [Router], une table qui distribue
/// les événements Discord aux composants abonnés.
///
/// [Router]: nero_core::event::Router
pub struct Bot {
    /// Client discord de serenity
    client: Client,
    _cmp_container: RefContainer,
}

/// Remplit le conteneur avec les composants du bot.
pub(crate) async fn build_container(config: &Config) -> RefContainer {
    let ref_container = Arc::new(RwLock::new(ComponentContainer::new()));
    {
        let mut container = ref_container.write().await;
        container.add_component(cmp::SlashCommand::new(Arc::clone(&ref_container)));
        container.add_component(cmp::Misc::new(config.permissions));
        container.add_component(cmp::Starboard::new(&config.data_dir));
    }
    ref_container
}

impl Bot {
    /// Crée un nouveau bot et l'initialise.
    pub async fn new(config: &Config) -> Result<Bot> {
        let ref_container = build_container(config).await;
        let router = ref_container.read().await.get_router();
        let client = Client::builder(&config.token, GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT)
            .raw_event_handler(router)
            .application_id(config.app_id)
            .await?;
        Ok(Bot {
            client,
            _cmp_container: ref_container,
        })
    }
    /// Lance le bot jusqu'à sa déconnexion ou un Ctrl+C.
    pub async fn start(&mut self) -> Result<()> {
        let shard_manager = Arc::clone(&self.client.shard_manager);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    log_info!("Arrêt du bot");
                    shard_manager.lock().await.shutdown_all().await;
                }
                Err(e) => log_error!("Impossible d'écouter le signal d'arrêt: {}", e),
            }
        });
        self.client.start().await
    }
}
