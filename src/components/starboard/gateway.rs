//! Accès à Discord pour le starboard.
//!
//! Le gestionnaire de votes ne parle à Discord qu'à travers [`Gateway`],
//! ce qui permet de le faire tourner sans client pendant les tests.

use std::{sync::Arc, time::Duration};

use chrono::{TimeZone, Utc};
use serenity::{
    async_trait,
    cache::Cache,
    client::Context,
    http::Http,
    model::{
        application::component::ButtonStyle,
        channel::Message,
        id::{ChannelId, GuildId, MessageId},
    },
};

use crate::log_warn;
use super::{
    embed::StarEmbed,
    model::{Attachment, Author, EmbedMedia, SourceMessage},
    Error,
};

/// Durée de vie de la notification sur le message original
pub const NOTICE_LIFETIME: Duration = Duration::from_secs(120);

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn fetch_message(&self, guild_id: GuildId, channel_id: ChannelId, message_id: MessageId) -> Result<SourceMessage, Error>;
    /// Publie la copie et retourne son identifiant.
    async fn post_mirror(&self, channel_id: ChannelId, embed: &StarEmbed, jump_url: &str) -> Result<MessageId, Error>;
    async fn edit_mirror(&self, channel_id: ChannelId, mirror_id: MessageId, embed: &StarEmbed) -> Result<(), Error>;
    /// Signale sur le message original qu'il a été publié.
    async fn notify_posted(&self, original: &SourceMessage, post_channel: ChannelId) -> Result<(), Error>;
}

pub struct SerenityGateway {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityGateway {
    pub fn new(ctx: &Context) -> Self {
        Self {
            http: Arc::clone(&ctx.http),
            cache: Arc::clone(&ctx.cache),
        }
    }
    fn to_source(&self, guild_id: GuildId, msg: &Message) -> SourceMessage {
        SourceMessage {
            id: msg.id,
            channel_id: msg.channel_id,
            guild_id,
            author: Author {
                name: msg.author.name.clone(),
                avatar_url: msg.author.face(),
            },
            content: msg.content_safe(&self.cache),
            created_at: Utc.timestamp_opt(msg.timestamp.unix_timestamp(), 0)
                .single()
                .unwrap_or_else(Utc::now),
            attachments: msg.attachments
                .iter()
                .map(|a| Attachment {
                    url: a.url.clone(),
                    filename: a.filename.clone(),
                    content_type: a.content_type.clone(),
                })
                .collect(),
            embeds: msg.embeds
                .iter()
                .map(|e| EmbedMedia {
                    image: e.image.as_ref().map(|i| i.url.clone()),
                    thumbnail: e.thumbnail.as_ref().map(|t| t.url.clone()),
                })
                .collect(),
            reference: msg.message_reference.as_ref().and_then(|r| r.message_id),
        }
    }
}

#[async_trait]
impl Gateway for SerenityGateway {
    async fn fetch_message(&self, guild_id: GuildId, channel_id: ChannelId, message_id: MessageId) -> Result<SourceMessage, Error> {
        let msg = channel_id.message(&self.http, message_id).await?;
        Ok(self.to_source(guild_id, &msg))
    }
    async fn post_mirror(&self, channel_id: ChannelId, embed: &StarEmbed, jump_url: &str) -> Result<MessageId, Error> {
        let msg = channel_id.send_message(&self.http, |m| {
            m.set_embed(embed.into())
                .components(|c| c.create_action_row(|row| {
                    row.create_button(|b| b.style(ButtonStyle::Link).label("Aller au message").url(jump_url))
                }))
        }).await?;
        Ok(msg.id)
    }
    async fn edit_mirror(&self, channel_id: ChannelId, mirror_id: MessageId, embed: &StarEmbed) -> Result<(), Error> {
        channel_id.edit_message(&self.http, mirror_id, |m| m.set_embed(embed.into())).await?;
        Ok(())
    }
    async fn notify_posted(&self, original: &SourceMessage, post_channel: ChannelId) -> Result<(), Error> {
        let notice = original.channel_id.send_message(&self.http, |m| {
            m.content(format!("Ce message a été enregistré sur <#{}> !", post_channel.0))
                .reference_message((original.channel_id, original.id))
                .allowed_mentions(|a| a.replied_user(false))
        }).await?;
        let http = Arc::clone(&self.http);
        tokio::spawn(async move {
            tokio::time::sleep(NOTICE_LIFETIME).await;
            if let Err(e) = notice.channel_id.delete_message(&http, notice.id).await {
                log_warn!("Notification Starboard {} non supprimée: {}", notice.id, e);
            }
        });
        Ok(())
    }
}
