//! Enregistrement des commandes slash sur les serveurs.

use std::collections::HashSet;

use nero_core::{container::RefContainer, ComponentDeclarative, ComponentEvent, EventKind};
use serenity::{async_trait, client::Context, model::{event::Event, id::GuildId}};
use tokio::sync::Mutex;

use crate::{log_info, log_warn};

pub struct SlashCommand {
    container: RefContainer,
    /// Serveurs sur lesquels les commandes ont déjà été envoyées
    registered: Mutex<HashSet<GuildId>>,
}

impl SlashCommand {
    pub fn new(container: RefContainer) -> SlashCommand {
        SlashCommand {
            container,
            registered: Mutex::new(HashSet::new()),
        }
    }
    /// Retourne `false` si le serveur a déjà reçu ses commandes.
    ///
    /// Au démarrage, chaque serveur arrive dans `Ready` puis dans son propre `GuildCreate`.
    async fn claim(&self, guild_id: GuildId) -> bool {
        self.registered.lock().await.insert(guild_id)
    }
    /// Remplace les commandes du serveur par celles déclarées par les composants.
    async fn register(&self, ctx: &Context, guild_id: GuildId) {
        if !self.claim(guild_id).await {
            return;
        }
        let container = self.container.read().await;
        let status = guild_id.set_application_commands(&ctx.http, |commands| {
            container.declare_commands(commands);
            commands
        }).await;
        let guild_name = guild_id.name(&ctx.cache).unwrap_or_else(|| guild_id.0.to_string());
        match status {
            Ok(commands) => log_info!("{} commande(s) slash ajoutée(s) sur {}", commands.len(), guild_name),
            Err(why) => {
                log_warn!("Erreur lors de l'ajout des commandes slash sur \"{}\": {}", guild_name, why);
                self.registered.lock().await.remove(&guild_id);
            }
        }
    }
}

impl ComponentDeclarative for SlashCommand {}

#[async_trait]
impl ComponentEvent for SlashCommand {
    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Ready, EventKind::GuildCreate]
    }
    async fn event(&self, ctx: &Context, event: &Event) {
        match event {
            Event::Ready(ready) => {
                for guild in &ready.ready.guilds {
                    self.register(ctx, guild.id).await;
                }
            }
            Event::GuildCreate(create) => self.register(ctx, create.guild.id).await,
            _ => (),
        }
    }
}
