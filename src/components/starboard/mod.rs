//! Starboard : salon des messages favoris.
//!
//! Les messages qui reçoivent assez de votes ⭐ en moins de 24 heures sont copiés
//! dans un salon dédié. La copie est mise à jour à chaque nouveau vote.
//!
//! Paramètres par serveur, modifiables avec `/star set` :
//! - `PostChannelID` : salon de publication (0 = désactivé)
//! - `PostTarget` : nombre de votes nécessaires
//! - `AdaptiveTargetRange`, `DetectPotentialPost` : conservés mais sans effet

mod error;
mod gateway;
mod settings;
mod store;
mod sweeper;
mod votes;
pub mod embed;
pub mod model;

use std::{collections::BTreeMap, path::Path, sync::Arc};

use chrono::Utc;
use nero_core::{
    message::{self, Message},
    ApplicationCommandEmbed, AutocompleteEmbed, ComponentDeclarative, ComponentEvent, EventKind,
};
use serenity::{
    async_trait,
    builder::CreateApplicationCommands,
    client::Context,
    model::{
        application::{command::CommandOptionType, interaction::Interaction},
        event::Event,
        id::GuildId,
        permissions::Permissions,
    },
};
use tokio::sync::Mutex;

use crate::{components::utils::fuzzy, log_debug, log_error, log_info, log_warn};
pub use error::Error;
use gateway::SerenityGateway;
use model::StarReaction;
use settings::SettingKey;
use store::StarboardStore;
use sweeper::Sweeper;
use votes::{Outcome, VoteHandler};

/// Nombre maximum de choix proposés par Discord en autocomplétion
const MAX_CHOICES: usize = 25;

pub struct Starboard {
    store: Arc<StarboardStore>,
    votes: VoteHandler,
    sweeper: Mutex<Option<Sweeper>>,
}

impl Starboard {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let store = Arc::new(StarboardStore::new(data_dir));
        Self {
            votes: VoteHandler::new(Arc::clone(&store)),
            store,
            sweeper: Mutex::new(None),
        }
    }

    async fn init_guilds<I: IntoIterator<Item = GuildId>>(&self, guilds: I) {
        for guild in guilds {
            if let Err(e) = self.store.init_guild(guild).await {
                log_error!("Starboard: initialisation de la base du serveur {} impossible: {}", guild, e);
            }
        }
    }

    async fn on_ready(&self, guilds: Vec<GuildId>) {
        self.init_guilds(guilds).await;
        let mut sweeper = self.sweeper.lock().await;
        if sweeper.is_none() {
            *sweeper = Some(Sweeper::start(Arc::clone(&self.store), sweeper::SWEEP_INTERVAL));
        }
    }

    async fn on_reaction(&self, ctx: &Context, reaction: StarReaction) {
        if !reaction.is_star() {
            return;
        }
        let gateway = SerenityGateway::new(ctx);
        match self.votes.handle(&gateway, &reaction, Utc::now()).await {
            Ok(Outcome::Posted { mirror }) => log_info!("Starboard: message {} publié ({})", reaction.message_id, mirror),
            Ok(outcome) => log_debug!("Starboard: {} -> {:?}", reaction.message_id, outcome),
            Err(Error::NotConfigured) => log_debug!("Starboard: vote ignoré, {}", Error::NotConfigured),
            Err(e) => log_error!("Starboard: vote sur {} non traité: {}", reaction.message_id, e),
        }
    }

    /// Modifie un paramètre du serveur et retourne la réponse à afficher.
    pub async fn set_setting(&self, guild: GuildId, setting: &str, value: &str) -> Message {
        if SettingKey::from_name(setting).is_none() {
            return message::error(format!("Le paramètre `{}` n'existe pas", setting));
        }
        let mut update = BTreeMap::new();
        update.insert(setting.to_string(), settings::parse_value(value));
        if let Err(e) = self.store.set_settings(guild, &update).await {
            log_error!("Erreur dans set_starboard_settings : {}", e);
            return message::error("Il y a eu une erreur lors du réglage du paramètre, remontez cette erreur au propriétaire du bot");
        }
        message::success(format!("Le paramètre `{}` a été réglé sur `{}`", setting, value))
    }

    /// Choix d'autocomplétion `Nom (valeur)` pour le paramètre en cours de saisie.
    pub async fn setting_choices(&self, guild: GuildId, current: &str) -> Result<Vec<(String, String)>, Error> {
        let settings: Vec<_> = self.store.settings(guild).await?.into_iter().collect();
        Ok(fuzzy::finder(current, &settings, |(name, _)| name.as_str())
            .into_iter()
            .take(MAX_CHOICES)
            .map(|(name, value)| (format!("{} ({})", name, value), name.clone()))
            .collect())
    }

    async fn command_set(&self, ctx: &Context, app_cmd: ApplicationCommandEmbed<'_>) {
        let msg = 'reply: {
            let Some(guild_id) = app_cmd.get_guild_id() else {
                break 'reply message::error("Cette commande doit être exécutée sur un serveur");
            };
            if !app_cmd.member_permissions().map_or(false, |perms| perms.manage_messages()) {
                break 'reply message::error("Tu manques de la permission `Gérer les messages` pour cette commande !");
            }
            match (app_cmd.get_str("setting"), app_cmd.get_str("value")) {
                (Some(setting), Some(value)) => self.set_setting(guild_id, setting, value).await,
                _ => message::error("setting, value: Paramètre requis manquant"),
            }
        };
        if let Err(e) = app_cmd.direct_response(ctx, msg.set_ephemeral(true)).await {
            log_error!("star set: Erreur lors de la réponse: {}", e);
        }
    }

    async fn autocomplete_set(&self, ctx: &Context, autocomplete: AutocompleteEmbed<'_>) {
        let (Some(guild_id), Some(("setting", current))) = (autocomplete.get_guild_id(), autocomplete.focused()) else {
            return;
        };
        let choices = match self.setting_choices(guild_id, current).await {
            Ok(choices) => choices,
            Err(e) => {
                log_warn!("star set: autocomplétion impossible: {}", e);
                return;
            }
        };
        if let Err(e) = autocomplete.respond(ctx, choices).await {
            log_warn!("star set: Erreur lors de l'autocomplétion: {}", e);
        }
    }
}

impl ComponentDeclarative for Starboard {
    fn declare(&self, commands: &mut CreateApplicationCommands) {
        commands.create_application_command(|cmd| {
            cmd.name("star")
                .description("Gestion et maintenance d'un salon de messages favoris")
                .dm_permission(false)
                .default_member_permissions(Permissions::MANAGE_MESSAGES)
                .create_option(|set| {
                    set.kind(CommandOptionType::SubCommand)
                        .name("set")
                        .description("Modifier les paramètres de Starboard (salon des messages favoris)")
                        .create_sub_option(|opt| {
                            opt.kind(CommandOptionType::String)
                                .name("setting")
                                .description("Nom du paramètre à modifier")
                                .required(true)
                                .set_autocomplete(true)
                        })
                        .create_sub_option(|opt| {
                            opt.kind(CommandOptionType::String)
                                .name("value")
                                .description("Valeur à attribuer au paramètre (sera sérialisée en JSON)")
                                .required(true)
                        })
                })
        });
    }
}

#[async_trait]
impl ComponentEvent for Starboard {
    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Ready, EventKind::GuildCreate, EventKind::ReactionAdd, EventKind::InteractionCreate]
    }
    async fn event(&self, ctx: &Context, event: &Event) {
        match event {
            Event::Ready(ready) => {
                self.on_ready(ready.ready.guilds.iter().map(|g| g.id).collect()).await
            }
            Event::GuildCreate(create) => self.init_guilds([create.guild.id]).await,
            Event::ReactionAdd(add) => self.on_reaction(ctx, StarReaction::from(&add.reaction)).await,
            Event::InteractionCreate(create) => match &create.interaction {
                Interaction::ApplicationCommand(cmd) => {
                    let app_cmd = ApplicationCommandEmbed::new(cmd);
                    if app_cmd.fullname() == "star.set" {
                        self.command_set(ctx, app_cmd).await
                    }
                }
                Interaction::Autocomplete(autocomplete) => {
                    let autocomplete = AutocompleteEmbed::new(autocomplete);
                    if autocomplete.fullname() == "star.set" {
                        self.autocomplete_set(ctx, autocomplete).await
                    }
                }
                _ => (),
            },
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value as JsonValue;
    use super::*;

    const GUILD: GuildId = GuildId(77);

    #[tokio::test]
    async fn set_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let starboard = Starboard::new(dir.path());

        let reply = starboard.set_setting(GUILD, "PostTarget", "3").await;
        assert_eq!(reply.content, "**Succès ·** Le paramètre `PostTarget` a été réglé sur `3`");
        let settings = starboard.store.settings(GUILD).await.unwrap();
        assert_eq!(settings["PostTarget"], JsonValue::from(3));
        assert_eq!(starboard.store.guild_settings(GUILD).await.unwrap().post_target, 3);
    }

    #[tokio::test]
    async fn unknown_setting_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let starboard = Starboard::new(dir.path());

        let reply = starboard.set_setting(GUILD, "Couleur", "rouge").await;
        assert_eq!(reply.content, "**Erreur ·** Le paramètre `Couleur` n'existe pas");
        assert!(!starboard.store.settings(GUILD).await.unwrap().contains_key("Couleur"));
    }

    #[tokio::test]
    async fn invalid_value_is_stored_but_reported_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let starboard = Starboard::new(dir.path());

        starboard.set_setting(GUILD, "PostTarget", "beaucoup").await;
        let settings = starboard.store.settings(GUILD).await.unwrap();
        assert_eq!(settings["PostTarget"], JsonValue::from("beaucoup"));
        assert!(matches!(
            starboard.store.guild_settings(GUILD).await,
            Err(Error::InvalidSetting { name: "PostTarget", .. })
        ));
    }

    #[tokio::test]
    async fn autocomplete_choices() {
        let dir = tempfile::tempdir().unwrap();
        let starboard = Starboard::new(dir.path());
        starboard.set_setting(GUILD, "PostTarget", "3").await;

        let choices = starboard.setting_choices(GUILD, "target").await.unwrap();
        assert_eq!(choices, vec![
            ("PostTarget (3)".to_string(), "PostTarget".to_string()),
            ("AdaptiveTargetRange (2)".to_string(), "AdaptiveTargetRange".to_string()),
        ]);
        assert_eq!(starboard.setting_choices(GUILD, "").await.unwrap().len(), 4);
    }

    #[test]
    fn subscriptions() {
        let dir = tempfile::tempdir().unwrap();
        let starboard = Starboard::new(dir.path());
        assert!(starboard.subscriptions().contains(&EventKind::ReactionAdd));
        assert!(starboard.subscriptions().contains(&EventKind::InteractionCreate));
    }
}
