use chrono::{DateTime, TimeZone, Utc};
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};

use crate::db::model::starboard::message;

/// Emoji de vote
pub const STAR: &str = "⭐";

pub const IMAGE_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Auteur d'un message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub filename: String,
    pub content_type: Option<String>,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(false, |kind| IMAGE_CONTENT_TYPES.contains(&kind))
    }
}

/// Images d'un embed présent dans un message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmbedMedia {
    pub image: Option<String>,
    pub thumbnail: Option<String>,
}

/// Message Discord tel que le starboard le voit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: GuildId,
    pub author: Author,
    /// Contenu nettoyé des mentions
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub attachments: Vec<Attachment>,
    pub embeds: Vec<EmbedMedia>,
    /// Message auquel celui-ci répond
    pub reference: Option<MessageId>,
}

impl SourceMessage {
    pub fn jump_url(&self) -> String {
        format!("https://discord.com/channels/{}/{}/{}", self.guild_id.0, self.channel_id.0, self.id.0)
    }
}

/// Réaction reçue de la gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarReaction {
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub user_id: Option<UserId>,
    pub emoji: String,
}

impl StarReaction {
    pub fn is_star(&self) -> bool {
        self.emoji == STAR
    }
}

impl From<&serenity::model::channel::Reaction> for StarReaction {
    fn from(reaction: &serenity::model::channel::Reaction) -> Self {
        use serenity::model::channel::ReactionType;
        let emoji = match &reaction.emoji {
            ReactionType::Unicode(emoji) => emoji.clone(),
            ReactionType::Custom { name, .. } => name.clone().unwrap_or_default(),
            _ => String::new(),
        };
        StarReaction {
            guild_id: reaction.guild_id,
            channel_id: reaction.channel_id,
            message_id: reaction.message_id,
            user_id: reaction.user_id,
            emoji,
        }
    }
}

/// Message suivi par le starboard
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedMessage {
    pub message_id: MessageId,
    /// Votants, sans doublon, dans l'ordre des votes
    pub votes: Vec<UserId>,
    /// Message publié dans le salon starboard
    pub mirror: Option<MessageId>,
    pub created_at: DateTime<Utc>,
}

impl TrackedMessage {
    /// Ajoute un vote. Retourne `false` si l'utilisateur a déjà voté.
    pub fn add_vote(&mut self, user: UserId) -> bool {
        if self.votes.contains(&user) {
            return false;
        }
        self.votes.push(user);
        true
    }
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }
    pub fn voter_ids(&self) -> Vec<u64> {
        self.votes.iter().map(|user| user.0).collect()
    }
}

pub fn to_unix(date: DateTime<Utc>) -> f64 {
    date.timestamp_millis() as f64 / 1000.0
}

pub fn from_unix(timestamp: f64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt((timestamp * 1000.0) as i64)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl TryFrom<message::Model> for TrackedMessage {
    type Error = serde_json::Error;
    fn try_from(model: message::Model) -> Result<Self, Self::Error> {
        let ids: Vec<u64> = serde_json::from_str(&model.votes)?;
        let mut tracked = TrackedMessage {
            message_id: MessageId(model.message_id as u64),
            votes: Vec::with_capacity(ids.len()),
            mirror: match model.embed_message {
                0 => None,
                id => Some(MessageId(id as u64)),
            },
            created_at: from_unix(model.created_at),
        };
        for id in ids {
            tracked.add_vote(UserId(id));
        }
        Ok(tracked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn votes_are_unique() {
        let mut tracked = TrackedMessage {
            message_id: MessageId(1),
            votes: vec![],
            mirror: None,
            created_at: Utc::now(),
        };
        assert!(tracked.add_vote(UserId(10)));
        assert!(tracked.add_vote(UserId(11)));
        assert!(!tracked.add_vote(UserId(10)));
        assert_eq!(tracked.vote_count(), 2);
        assert_eq!(tracked.voter_ids(), vec![10, 11]);
    }

    #[test]
    fn from_row() {
        let row = message::Model {
            message_id: 42,
            votes: "[7, 8, 7]".to_string(),
            embed_message: 0,
            created_at: 1_700_000_000.5,
        };
        let tracked = TrackedMessage::try_from(row).unwrap();
        assert_eq!(tracked.message_id, MessageId(42));
        assert_eq!(tracked.votes, vec![UserId(7), UserId(8)]);
        assert_eq!(tracked.mirror, None);
        assert_eq!(tracked.created_at.timestamp_millis(), 1_700_000_000_500);

        let row = message::Model {
            message_id: 42,
            votes: "[]".to_string(),
            embed_message: 99,
            created_at: 0.0,
        };
        assert_eq!(TrackedMessage::try_from(row).unwrap().mirror, Some(MessageId(99)));
    }

    #[test]
    fn unix_round_trip() {
        let date = Utc.timestamp_millis_opt(1_650_000_123_250).unwrap();
        assert_eq!(from_unix(to_unix(date)), date);
    }

    #[test]
    fn jump_url() {
        let msg = SourceMessage {
            id: MessageId(3),
            channel_id: ChannelId(2),
            guild_id: GuildId(1),
            author: Author { name: "Alice".into(), avatar_url: String::new() },
            content: String::new(),
            created_at: Utc::now(),
            attachments: vec![],
            embeds: vec![],
            reference: None,
        };
        assert_eq!(msg.jump_url(), "https://discord.com/channels/1/2/3");
    }
}
