//! Paramètres Starboard d'un serveur.
//!
//! Les valeurs sont stockées en JSON sans validation. La lecture typée ([`GuildSettings`])
//! accepte un nombre comme une chaîne numérique et signale les valeurs inutilisables.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use serenity::model::id::ChannelId;

use super::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// Salon où sont publiés les messages favoris, 0 si non configuré
    PostChannelId,
    /// Nombre de votes nécessaires
    PostTarget,
    AdaptiveTargetRange,
    DetectPotentialPost,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::PostChannelId,
        SettingKey::PostTarget,
        SettingKey::AdaptiveTargetRange,
        SettingKey::DetectPotentialPost,
    ];
    pub fn name(self) -> &'static str {
        match self {
            SettingKey::PostChannelId => "PostChannelID",
            SettingKey::PostTarget => "PostTarget",
            SettingKey::AdaptiveTargetRange => "AdaptiveTargetRange",
            SettingKey::DetectPotentialPost => "DetectPotentialPost",
        }
    }
    pub fn default_value(self) -> JsonValue {
        match self {
            SettingKey::PostChannelId => JsonValue::from(0),
            SettingKey::PostTarget => JsonValue::from(5),
            SettingKey::AdaptiveTargetRange => JsonValue::from(2),
            SettingKey::DetectPotentialPost => JsonValue::from(true),
        }
    }
    pub fn from_name(name: &str) -> Option<SettingKey> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

pub fn defaults() -> Vec<(&'static str, JsonValue)> {
    SettingKey::ALL
        .into_iter()
        .map(|key| (key.name(), key.default_value()))
        .collect()
}

/// Valeur saisie par un utilisateur : du JSON si c'en est, sinon une chaîne.
pub fn parse_value(raw: &str) -> JsonValue {
    serde_json::from_str(raw.trim()).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

fn as_u64(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_i64(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(value: &JsonValue) -> Option<bool> {
    match value {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::Number(n) => n.as_i64().map(|n| n != 0),
        JsonValue::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "oui" => Some(true),
            "false" | "0" | "non" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Paramètres typés d'un serveur
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSettings {
    pub post_channel: Option<ChannelId>,
    pub post_target: usize,
    pub adaptive_target_range: i64,
    pub detect_potential_post: bool,
}

impl Default for GuildSettings {
    fn default() -> Self {
        GuildSettings {
            post_channel: None,
            post_target: 5,
            adaptive_target_range: 2,
            detect_potential_post: true,
        }
    }
}

impl GuildSettings {
    pub fn from_raw(raw: &BTreeMap<String, JsonValue>) -> Result<Self, Error> {
        fn read<T>(raw: &BTreeMap<String, JsonValue>, key: SettingKey, parse: fn(&JsonValue) -> Option<T>) -> Result<Option<T>, Error> {
            match raw.get(key.name()) {
                None => Ok(None),
                Some(value) => parse(value)
                    .map(Some)
                    .ok_or_else(|| Error::InvalidSetting { name: key.name(), value: value.clone() }),
            }
        }
        let mut settings = GuildSettings::default();
        if let Some(channel) = read(raw, SettingKey::PostChannelId, as_u64)? {
            settings.post_channel = (channel != 0).then_some(ChannelId(channel));
        }
        if let Some(target) = read(raw, SettingKey::PostTarget, as_u64)? {
            settings.post_target = target as usize;
        }
        if let Some(range) = read(raw, SettingKey::AdaptiveTargetRange, as_i64)? {
            settings.adaptive_target_range = range;
        }
        if let Some(detect) = read(raw, SettingKey::DetectPotentialPost, as_bool)? {
            settings.detect_potential_post = detect;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, JsonValue)]) -> BTreeMap<String, JsonValue> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn names() {
        assert_eq!(SettingKey::from_name("PostChannelID"), Some(SettingKey::PostChannelId));
        assert_eq!(SettingKey::from_name("postchannelid"), None);
        assert_eq!(defaults().len(), 4);
    }

    #[test]
    fn parse_user_value() {
        assert_eq!(parse_value("3"), JsonValue::from(3));
        assert_eq!(parse_value("true"), JsonValue::from(true));
        assert_eq!(parse_value("salon"), JsonValue::from("salon"));
        assert_eq!(parse_value("\"3\""), JsonValue::from("3"));
    }

    #[test]
    fn defaults_when_empty() {
        assert_eq!(GuildSettings::from_raw(&BTreeMap::new()).unwrap(), GuildSettings::default());
        let seeded = raw(&defaults());
        assert_eq!(GuildSettings::from_raw(&seeded).unwrap(), GuildSettings::default());
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let settings = GuildSettings::from_raw(&raw(&[
            ("PostChannelID", JsonValue::from("123456789012345678")),
            ("PostTarget", JsonValue::from("3")),
            ("DetectPotentialPost", JsonValue::from("false")),
        ])).unwrap();
        assert_eq!(settings.post_channel, Some(ChannelId(123456789012345678)));
        assert_eq!(settings.post_target, 3);
        assert!(!settings.detect_potential_post);
    }

    #[test]
    fn invalid_value_is_reported() {
        let err = GuildSettings::from_raw(&raw(&[("PostTarget", JsonValue::from("beaucoup"))])).unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { name: "PostTarget", .. }));
    }
}
