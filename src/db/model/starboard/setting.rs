use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    /// Nom du paramètre (`PostChannelID`, `PostTarget`...)
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Valeur sérialisée en JSON
    #[sea_orm(column_type = "Text")]
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel 
{}
