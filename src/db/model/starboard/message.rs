use sea_orm::entity::prelude::*;
use crate::db::IDType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    /// Identifiant du message original
    #[sea_orm(primary_key, auto_increment = false)]
    pub message_id: IDType,
    /// Votants, tableau JSON d'identifiants
    #[sea_orm(column_type = "Text")]
    pub votes: String,
    /// Identifiant du message publié dans le salon starboard, 0 si aucun
    pub embed_message: IDType,
    /// Timestamp unix de début du suivi
    pub created_at: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel 
{}
