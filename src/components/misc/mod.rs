//! Commandes et événements divers.

use std::time::Instant;

use crate::{log_error, log_info, log_warn};
use nero_core::{message, ApplicationCommandEmbed, ComponentDeclarative, ComponentEvent, EventKind};
use serenity::{
    async_trait,
    builder::CreateApplicationCommands,
    client::Context,
    model::{application::interaction::Interaction, event::{Event, ReadyEvent}, permissions::Permissions},
};

pub struct Misc {
    bot_permissions: u64,
}

/// Permissions du lien d'invitation, celles par défaut si la configuration est invalide.
fn invite_permissions(bits: u64) -> Permissions {
    match Permissions::from_bits(bits) {
        Some(perms) => perms,
        None => {
            log_warn!("Permission du bot dans la configuration invalide. Utilisation des permissions par défaut.");
            Permissions::default()
        }
    }
}

fn pong(elapsed_ms: u128) -> String {
    format!("Pong ! (`{}ms`)", elapsed_ms)
}

impl Misc {
    pub fn new(bot_permissions: u64) -> Self {
        Self { bot_permissions }
    }
    async fn on_ready(&self, ctx: &Context, ready: &ReadyEvent) {
        let user = &ready.ready.user;
        log_info!("Connecté en tant que {}#{:04} ({})", user.name, user.discriminator, user.id);
        let perms = invite_permissions(self.bot_permissions);
        log_info!("Permission(s) demandé par le bot: {}", perms);
        match user.invite_url(&ctx.http, perms).await {
            Ok(v) => log_info!("Invitation: {}", v),
            Err(e) => log_warn!("Lien d'invitation impossible à créer: {}", e),
        }
    }
    async fn ping(&self, ctx: &Context, app_cmd: ApplicationCommandEmbed<'_>) {
        let start = Instant::now();
        if let Err(e) = app_cmd.direct_response(ctx, message::Message::with_text("Pong !")).await {
            log_error!("ping: Erreur lors de la réponse: {}", e);
            return;
        }
        let elapsed = start.elapsed().as_millis();
        if let Err(e) = app_cmd.edit_response(ctx, message::Message::with_text(pong(elapsed))).await {
            log_error!("ping: Erreur lors de la réponse: {}", e);
        }
    }
}

impl ComponentDeclarative for Misc {
    fn declare(&self, commands: &mut CreateApplicationCommands) {
        commands.create_application_command(|cmd| cmd.name("ping").description("Pong!"));
    }
}

#[async_trait]
impl ComponentEvent for Misc {
    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Ready, EventKind::InteractionCreate]
    }
    async fn event(&self, ctx: &Context, event: &Event) {
        match event {
            Event::Ready(ready) => self.on_ready(ctx, ready).await,
            Event::InteractionCreate(create) => {
                if let Interaction::ApplicationCommand(cmd) = &create.interaction {
                    let app_cmd = ApplicationCommandEmbed::new(cmd);
                    if app_cmd.fullname() == "ping" {
                        self.ping(ctx, app_cmd).await
                    }
                }
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pong_format() {
        assert_eq!(pong(42), "Pong ! (`42ms`)");
    }

    #[test]
    fn invalid_permissions_fall_back() {
        assert_eq!(invite_permissions(Permissions::SEND_MESSAGES.bits()), Permissions::SEND_MESSAGES);
        assert_eq!(invite_permissions(u64::MAX), Permissions::default());
    }
}
