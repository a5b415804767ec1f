use serenity::{
    client::Context,
    model::{
        application::{
            command::CommandOptionType,
            interaction::{
                application_command::{ApplicationCommandInteraction, CommandData, CommandDataOption},
                autocomplete::AutocompleteInteraction,
                InteractionResponseType,
            },
        },
        id::GuildId,
        permissions::Permissions,
    },
};

use crate::message::Message;

/// Options of the deepest (sub) command of an interaction.
fn leaf_options(data: &CommandData) -> &[CommandDataOption] {
    let mut options = data.options.as_slice();
    while let Some(sub) = options.iter().find(|option| matches!(option.kind, CommandOptionType::SubCommand | CommandOptionType::SubCommandGroup)) {
        options = sub.options.as_slice();
    }
    options
}

/// Full name of the command such as `group.sub_group.command`.
fn fullname(data: &CommandData) -> String {
    let mut names = vec![data.name.as_str()];
    let mut cmd = data.options.first();
    while let Some(CommandDataOption { name, options, kind: CommandOptionType::SubCommandGroup | CommandOptionType::SubCommand, .. }) = cmd {
        names.push(name.as_str());
        cmd = options.first();
    }
    names.join(".")
}

/// # Conteneur d'application command
///
/// Lorsque le bot reçoit une commande via un événement de type interaction, cette structure facilite
/// l'accès aux données d'une [`ApplicationCommandInteraction`]. La commande et ses arguments
/// pouvant se situer à différents niveaux en fonction des sous groupes, [`get_str`] permet
/// d'obtenir directement les arguments.
///
/// [`get_str`]: Self::get_str
#[derive(Clone, Copy)]
pub struct ApplicationCommandEmbed<'a>(pub &'a ApplicationCommandInteraction);

impl<'a> ApplicationCommandEmbed<'a> {
    pub fn new(interaction: &'a ApplicationCommandInteraction) -> Self {
        ApplicationCommandEmbed(interaction)
    }
    /// Retourne le nom de la commande complète.
    ///
    /// Ca inclut le nom des sous groupes et de la commande tel que `groupe.sous_groupe.commande`
    pub fn fullname(&self) -> String {
        fullname(&self.0.data)
    }
    /// Retourne l'id du serveur sur lequel la commande a été effectuée.
    pub fn get_guild_id(&self) -> Option<GuildId> {
        self.0.guild_id
    }
    /// Cherche et retourne l'argument textuel `name`.
    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        let interaction: &'a ApplicationCommandInteraction = self.0;
        leaf_options(&interaction.data)
            .iter()
            .find(|option| option.name == name)
            .and_then(|option| option.value.as_ref())
            .and_then(|value| value.as_str())
    }
    /// Permissions de l'auteur de la commande dans le salon, si la commande vient d'un serveur.
    pub fn member_permissions(&self) -> Option<Permissions> {
        self.0.member.as_ref().and_then(|member| member.permissions)
    }
    pub async fn direct_response(&self, ctx: &Context, msg: Message) -> serenity::Result<()> {
        self.0.create_interaction_response(&ctx.http, |resp| {
            resp.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|data| data.content(msg.content).ephemeral(msg.ephemeral))
        }).await
    }
    /// Remplace le contenu de la réponse déjà envoyée.
    pub async fn edit_response(&self, ctx: &Context, msg: Message) -> serenity::Result<()> {
        self.0.edit_original_interaction_response(&ctx.http, |resp| resp.content(msg.content)).await?;
        Ok(())
    }
}

/// Conteneur d'interaction d'autocomplétion
#[derive(Clone, Copy)]
pub struct AutocompleteEmbed<'a>(pub &'a AutocompleteInteraction);

impl<'a> AutocompleteEmbed<'a> {
    pub fn new(interaction: &'a AutocompleteInteraction) -> Self {
        AutocompleteEmbed(interaction)
    }
    pub fn fullname(&self) -> String {
        fullname(&self.0.data)
    }
    pub fn get_guild_id(&self) -> Option<GuildId> {
        self.0.guild_id
    }
    /// Nom et saisie actuelle de l'argument en cours d'écriture.
    pub fn focused(&self) -> Option<(&'a str, &'a str)> {
        let interaction: &'a AutocompleteInteraction = self.0;
        leaf_options(&interaction.data)
            .iter()
            .find(|option| option.focused)
            .map(|option| (option.name.as_str(), option.value.as_ref().and_then(|v| v.as_str()).unwrap_or_default()))
    }
    /// Répond avec une liste de choix `(nom affiché, valeur)`.
    pub async fn respond(&self, ctx: &Context, choices: Vec<(String, String)>) -> serenity::Result<()> {
        self.0.create_autocomplete_response(&ctx.http, |resp| {
            for (name, value) in choices {
                resp.add_string_choice(name, value);
            }
            resp
        }).await
    }
}
