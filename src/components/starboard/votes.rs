//! Gestion des votes ⭐.
//!
//! Un message passe par trois états : non suivi, suivi (votes < objectif)
//! puis publié (une copie existe dans le salon Starboard). Chaque nouveau vote
//! après publication met la copie à jour.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serenity::model::id::MessageId;

use crate::{log_info, log_warn};
use super::{
    embed,
    gateway::Gateway,
    model::StarReaction,
    store::StarboardStore,
    Error,
};

/// Délai pendant lequel un message peut recevoir des votes
pub fn vote_window() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Réaction sans rapport avec le starboard
    Ignored,
    /// Message trop ancien pour être voté
    Expired,
    AlreadyVoted,
    Tracked { votes: usize },
    Posted { mirror: MessageId },
    Edited { mirror: MessageId },
    /// La copie a disparu, le suivi a été supprimé
    MirrorLost,
}

pub struct VoteHandler {
    store: Arc<StarboardStore>,
}

impl VoteHandler {
    pub fn new(store: Arc<StarboardStore>) -> Self {
        Self { store }
    }

    pub async fn handle<G: Gateway + ?Sized>(&self, gateway: &G, reaction: &StarReaction, now: DateTime<Utc>) -> Result<Outcome, Error> {
        let (Some(guild_id), Some(user_id)) = (reaction.guild_id, reaction.user_id) else {
            return Ok(Outcome::Ignored);
        };
        if !reaction.is_star() {
            return Ok(Outcome::Ignored);
        }
        let settings = self.store.guild_settings(guild_id).await?;
        let post_channel = settings.post_channel.ok_or(Error::NotConfigured)?;

        let _guard = self.store.lock_guild(guild_id).await;
        let message = gateway.fetch_message(guild_id, reaction.channel_id, reaction.message_id).await?;
        if message.created_at + vote_window() < now {
            return Ok(Outcome::Expired);
        }

        let mut tracked = match self.store.tracked(guild_id, message.id).await? {
            Some(tracked) => tracked,
            None => self.store.track(guild_id, message.id, now).await?,
        };
        if !tracked.add_vote(user_id) {
            return Ok(Outcome::AlreadyVoted);
        }
        self.store.save_votes(guild_id, &tracked).await?;
        if tracked.vote_count() < settings.post_target {
            return Ok(Outcome::Tracked { votes: tracked.vote_count() });
        }

        let reply = match message.reference {
            Some(reference) => match gateway.fetch_message(guild_id, message.channel_id, reference).await {
                Ok(reply) => Some(reply),
                Err(e) => {
                    log_info!("Starboard: réponse {} inaccessible: {}", reference, e);
                    None
                }
            },
            None => None,
        };
        let star_embed = embed::build(&message, reply.as_ref(), tracked.vote_count());

        match tracked.mirror {
            None => {
                let mirror = gateway.post_mirror(post_channel, &star_embed, &message.jump_url()).await?;
                self.store.set_mirror(guild_id, message.id, mirror).await?;
                if let Err(e) = gateway.notify_posted(&message, post_channel).await {
                    log_warn!("Starboard: notification impossible sur {}: {}", message.id, e);
                }
                Ok(Outcome::Posted { mirror })
            }
            Some(mirror) => match gateway.edit_mirror(post_channel, mirror, &star_embed).await {
                Ok(()) => Ok(Outcome::Edited { mirror }),
                Err(Error::NotFound) => {
                    log_info!("Impossible d'accéder à {} : données supprimées", mirror);
                    self.store.forget(guild_id, message.id).await?;
                    Ok(Outcome::MirrorLost)
                }
                Err(e) => Err(e),
            },
        }
    }
}
