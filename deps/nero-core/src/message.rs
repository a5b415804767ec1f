use std::fmt;

/// Réponse textuelle à une commande
///
/// Les réponses du bot suivent le format `**Statut ·** texte`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub content: String,
    pub ephemeral: bool,
}

impl Message {
    pub fn with_text<S: Into<String>>(content: S) -> Self {
        Message {
            content: content.into(),
            ..Default::default()
        }
    }
    pub fn set_ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Génère un message d'erreur
pub fn error<S: fmt::Display>(error_message: S) -> Message {
    status("Erreur", error_message)
}
/// Génère un message de succès
pub fn success<S: fmt::Display>(success_message: S) -> Message {
    status("Succès", success_message)
}
fn status<S: fmt::Display>(title: &str, message: S) -> Message {
    Message::with_text(format!("**{} ·** {}", title, message))
}

#[cfg(test)]
mod tests {
    #[test]
    fn status_format() {
        let msg = super::error("Le paramètre `Foo` n'existe pas").set_ephemeral(true);
        assert_eq!(msg.content, "**Erreur ·** Le paramètre `Foo` n'existe pas");
        assert!(msg.ephemeral);
        assert_eq!(super::success("ok").to_string(), "**Succès ·** ok");
    }
}
