//! Mise en forme d'un message favori.
//!
//! [`build`] est pure : le même message donne toujours le même [`StarEmbed`],
//! converti ensuite en [`CreateEmbed`] pour l'envoi.

use chrono::{DateTime, Utc};
use serenity::{builder::CreateEmbed, model::Timestamp};

use super::model::{SourceMessage, STAR};

pub const COLOR: u32 = 0x2F3136;
/// Longueur maximale de la citation du message répondu
pub const REPLY_QUOTE_MAX: usize = 200;
/// Limites Discord
pub const DESCRIPTION_MAX: usize = 4096;
pub const FIELD_VALUE_MAX: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarEmbed {
    pub author_name: String,
    pub author_icon: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub footer: String,
    pub color: u32,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    /// Valeur du champ « Média(s) »
    pub media: Option<String>,
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max - 1).collect();
    truncated.push('…');
    truncated
}

fn reply_quote(reply: &SourceMessage) -> String {
    let content = if reply.content.trim().is_empty() {
        "Contenu multimédia".to_string()
    } else {
        truncate(&reply.content, REPLY_QUOTE_MAX).replace('\n', "\n> ")
    };
    format!("> **{}** · <t:{}>\n> {}\n\n", reply.author.name, reply.created_at.timestamp(), content)
}

pub fn build(message: &SourceMessage, reply: Option<&SourceMessage>, votes: usize) -> StarEmbed {
    let mut description = reply.map(reply_quote).unwrap_or_default();
    description.push_str(&message.content);

    let mut image = None;
    let mut media_links = Vec::new();
    for attachment in &message.attachments {
        if attachment.is_image() && image.is_none() {
            image = Some(attachment.url.clone());
        } else {
            media_links.push(format!("[[{}]]({})", attachment.filename, attachment.url));
        }
    }
    for embed in &message.embeds {
        if image.is_some() {
            break;
        }
        image = embed.image.clone().or_else(|| embed.thumbnail.clone());
    }
    let thumbnail = reply
        .and_then(|reply| reply.attachments.iter().find(|a| a.is_image()))
        .map(|a| a.url.clone());

    StarEmbed {
        author_name: message.author.name.clone(),
        author_icon: message.author.avatar_url.clone(),
        description: truncate(&description, DESCRIPTION_MAX),
        timestamp: message.created_at,
        footer: format!("{} {}", STAR, votes),
        color: COLOR,
        image,
        thumbnail,
        media: (!media_links.is_empty()).then(|| truncate(&media_links.join("\n"), FIELD_VALUE_MAX)),
    }
}

impl From<&StarEmbed> for CreateEmbed {
    fn from(star: &StarEmbed) -> Self {
        let mut embed = CreateEmbed::default();
        embed
            .author(|a| a.name(&star.author_name).icon_url(&star.author_icon))
            .description(&star.description)
            .footer(|f| f.text(&star.footer))
            .color(star.color);
        if let Ok(timestamp) = Timestamp::from_unix_timestamp(star.timestamp.timestamp()) {
            embed.timestamp(timestamp);
        }
        if let Some(image) = &star.image {
            embed.image(image);
        }
        if let Some(thumbnail) = &star.thumbnail {
            embed.thumbnail(thumbnail);
        }
        if let Some(media) = &star.media {
            embed.field("Média(s)", media, false);
        }
        embed
    }
}
