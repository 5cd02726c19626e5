use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;

use crate::db::entities::{latest_prediction, patient};

pub const DEFAULT_HISTORY_LIMIT: u64 = 500;

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One display row: a patient joined to their latest prediction, if any.
/// `proba` and `predicted_at` stay `None` for patients not yet scored; the
/// "NOT RISKY" rendering of that state is applied by [`risk_label`] only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub id: i32,
    pub created_at: String,
    pub edad: f64,
    pub imc: f64,
    pub peso: f64,
    pub proba: Option<f64>,
    pub label: &'static str,
    pub predicted_at: Option<String>,
}

/// History rows plus the two parallel chart series (scored rows only),
/// derived from the same fetch.
#[derive(Debug, Clone, Serialize)]
pub struct HistorySnapshot {
    pub rows: Vec<HistoryRow>,
    pub chart_labels: Vec<String>,
    pub chart_values: Vec<f64>,
}

/// Display label for a patient's latest prediction. The comparison uses the
/// threshold stored with that prediction, not the currently configured one.
/// An unscored patient renders "NOT RISKY".
pub fn risk_label(prediction: Option<&latest_prediction::Model>) -> &'static str {
    match prediction {
        Some(p) if p.predicted_proba >= p.threshold => "RISKY",
        _ => "NOT RISKY",
    }
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Fetches up to `limit` patients ordered by submission time descending and
/// joins each to its latest prediction through the `latest_predictions`
/// view, so at most one prediction per patient is returned even when several
/// exist.
pub async fn latest_per_patient(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<HistorySnapshot, DbErr> {
    let patients = patient::Entity::find()
        .order_by_desc(patient::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?;

    let mut latest: HashMap<i32, latest_prediction::Model> = HashMap::new();
    if !patients.is_empty() {
        let ids: Vec<i32> = patients.iter().map(|p| p.id).collect();
        for row in latest_prediction::Entity::find()
            .filter(latest_prediction::Column::Id.is_in(ids))
            .all(db)
            .await?
        {
            latest.insert(row.id, row);
        }
    }

    let rows: Vec<HistoryRow> = patients
        .iter()
        .map(|p| {
            let prediction = latest.get(&p.id);
            HistoryRow {
                id: p.id,
                created_at: p.created_at.format(DISPLAY_TIME_FORMAT).to_string(),
                edad: p.edad,
                imc: p.imc,
                peso: p.peso,
                proba: prediction.map(|r| round4(r.predicted_proba)),
                label: risk_label(prediction),
                predicted_at: prediction
                    .map(|r| r.predicted_at.format(DISPLAY_TIME_FORMAT).to_string()),
            }
        })
        .collect();

    let chart_labels: Vec<String> = rows
        .iter()
        .filter_map(|r| r.predicted_at.clone())
        .collect();
    let chart_values: Vec<f64> = rows.iter().filter_map(|r| r.proba).collect();

    Ok(HistorySnapshot {
        rows,
        chart_labels,
        chart_values,
    })
}
