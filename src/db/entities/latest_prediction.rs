use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Read-only entity over the `latest_predictions` SQL view: the most recent
/// prediction per patient (by `created_at`, ties broken by highest id).
/// `id` is the patient id, so history lookups key directly on it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "latest_predictions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub predicted_proba: f64,
    pub predicted_label: i32,
    pub threshold: f64,
    pub predicted_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
