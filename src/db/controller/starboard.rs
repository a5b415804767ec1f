//! Requêtes sur la base d'un serveur pour le starboard.
//!
//! Chaque serveur possède sa propre base `starboard/g<id>.db` avec deux tables :
//! `settings` (paramètres) et `messages` (messages suivis).

use std::collections::BTreeMap;

use sea_orm::{
    sea_query::Expr,
    ColumnTrait, ConnectionTrait, DbConn, EntityTrait, QueryFilter, Schema, Statement, TransactionTrait,
};
use serde_json::Value as JsonValue;

use crate::db::{
    controller::Error,
    model::starboard::{message, setting, Setting, StarMessage},
    IDType,
};

/// Crée les tables si besoin et insère les paramètres par défaut manquants.
pub async fn init(db: &DbConn, defaults: &[(&str, JsonValue)]) -> Result<(), Error> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let txn = db.begin().await?;

    txn.execute(builder.build(schema.create_table_from_entity(StarMessage).if_not_exists())).await?;
    txn.execute(builder.build(schema.create_table_from_entity(Setting).if_not_exists())).await?;
    for (name, value) in defaults {
        txn.execute(Statement::from_sql_and_values(
            builder,
            "INSERT OR IGNORE INTO settings (name, value) VALUES (?, ?)",
            vec![(*name).into(), serde_json::to_string(value)?.into()],
        )).await?;
    }
    txn.commit().await?;
    Ok(())
}

pub async fn get_settings(db: &DbConn) -> Result<BTreeMap<String, JsonValue>, Error> {
    Setting::find()
        .all(db).await?
        .into_iter()
        .map(|row| -> Result<_, Error> { Ok((row.name, serde_json::from_str(&row.value)?)) })
        .collect()
}

/// Met à jour les paramètres existants. Les noms inconnus sont ignorés.
pub async fn set_settings(db: &DbConn, update: &BTreeMap<String, JsonValue>) -> Result<(), Error> {
    let txn = db.begin().await?;
    for (name, value) in update {
        Setting::update_many()
            .col_expr(setting::Column::Value, Expr::value(serde_json::to_string(value)?))
            .filter(setting::Column::Name.eq(name.as_str()))
            .exec(&txn).await?;
    }
    txn.commit().await?;
    Ok(())
}

pub async fn get_message(db: &DbConn, message_id: IDType) -> Result<Option<message::Model>, Error> {
    Ok(StarMessage::find_by_id(message_id).one(db).await?)
}

/// Commence le suivi d'un message s'il n'est pas déjà suivi et retourne la ligne enregistrée.
pub async fn track_message(db: &DbConn, message_id: IDType, created_at: f64) -> Result<message::Model, Error> {
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "INSERT OR IGNORE INTO messages (message_id, votes, embed_message, created_at) VALUES (?, ?, ?, ?)",
        vec![message_id.into(), "[]".into(), 0_i64.into(), created_at.into()],
    )).await?;
    StarMessage::find_by_id(message_id)
        .one(db).await?
        .ok_or_else(|| Error::SeaORM(sea_orm::DbErr::RecordNotFound(format!("messages.{}", message_id))))
}

pub async fn set_votes(db: &DbConn, message_id: IDType, votes: &[u64]) -> Result<(), Error> {
    StarMessage::update_many()
        .col_expr(message::Column::Votes, Expr::value(serde_json::to_string(votes)?))
        .filter(message::Column::MessageId.eq(message_id))
        .exec(db).await?;
    Ok(())
}

pub async fn set_embed_message(db: &DbConn, message_id: IDType, embed_message: IDType) -> Result<(), Error> {
    StarMessage::update_many()
        .col_expr(message::Column::EmbedMessage, Expr::value(embed_message))
        .filter(message::Column::MessageId.eq(message_id))
        .exec(db).await?;
    Ok(())
}

pub async fn delete_message(db: &DbConn, message_id: IDType) -> Result<(), Error> {
    StarMessage::delete_by_id(message_id).exec(db).await?;
    Ok(())
}

/// Supprime les messages suivis depuis avant `expiration` et retourne le nombre de lignes supprimées.
pub async fn delete_expired(db: &DbConn, expiration: f64) -> Result<u64, Error> {
    let res = StarMessage::delete_many()
        .filter(message::Column::CreatedAt.lt(expiration))
        .exec(db).await?;
    Ok(res.rows_affected)
}
