use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One submitted feature vector. Append-only: rows are never updated or
/// deleted by the application.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: ChronoDateTimeUtc,
    pub ex_fum: f64,
    pub consum_alcoh: f64,
    pub consum_alcoh_30: f64,
    pub niveldeactividadesemanal: f64,
    pub act_fis_frisk: f64,
    pub diet_frisk: f64,
    pub med_hta_fr: f64,
    pub glu_alta: f64,
    pub parien_dm: f64,
    pub edad: f64,
    pub mets: f64,
    pub sedentarismo: f64,
    pub talla: f64,
    pub peso: f64,
    pub imc: f64,
    pub mme: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::prediction::Entity")]
    Predictions,
}

impl Related<super::prediction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Predictions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
