use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set, TransactionTrait};
use tracing::debug;

use crate::db::entities::{patient, prediction};
use crate::features::FeatureVector;
use crate::model::RiskModel;

/// Result of one scored submission, echoing the threshold that produced the
/// label.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringOutcome {
    pub patient_id: i32,
    pub proba: f64,
    pub label: i32,
    pub threshold: f64,
}

impl ScoringOutcome {
    pub fn label_text(&self) -> &'static str {
        if self.label == 1 {
            "RISKY"
        } else {
            "NOT RISKY"
        }
    }
}

/// Scores a validated feature vector and records the submission and its
/// prediction as one transaction: both rows commit together or neither does.
///
/// When the classifier is unavailable the submission is still persisted with
/// proba 0.0 / label 0; model availability is a serving concern, not a
/// data-integrity concern.
pub async fn score_and_record(
    db: &DatabaseConnection,
    model: Option<&RiskModel>,
    features: &FeatureVector,
    threshold: f64,
) -> Result<ScoringOutcome, DbErr> {
    let proba = model
        .map(|m| m.predict_probability(features))
        .unwrap_or(0.0);
    let label = i32::from(proba >= threshold);

    let now = Utc::now();
    let txn = db.begin().await?;

    let patient_row = patient::ActiveModel {
        created_at: Set(now),
        ex_fum: Set(features.ex_fum),
        consum_alcoh: Set(features.consum_alcoh),
        consum_alcoh_30: Set(features.consum_alcoh_30),
        niveldeactividadesemanal: Set(features.niveldeactividadesemanal),
        act_fis_frisk: Set(features.act_fis_frisk),
        diet_frisk: Set(features.diet_frisk),
        med_hta_fr: Set(features.med_hta_fr),
        glu_alta: Set(features.glu_alta),
        parien_dm: Set(features.parien_dm),
        edad: Set(features.edad),
        mets: Set(features.mets),
        sedentarismo: Set(features.sedentarismo),
        talla: Set(features.talla),
        peso: Set(features.peso),
        imc: Set(features.imc),
        mme: Set(features.mme),
        ..Default::default() // id is assigned by the database
    }
    .insert(&txn)
    .await?;

    prediction::ActiveModel {
        patient_id: Set(patient_row.id),
        predicted_proba: Set(proba),
        predicted_label: Set(label),
        threshold: Set(threshold),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    debug!(
        patient_id = patient_row.id,
        proba, label, "recorded scored submission"
    );

    Ok(ScoringOutcome {
        patient_id: patient_row.id,
        proba,
        label,
        threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_NAMES;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::collections::HashMap;

    fn vector_of_ones() -> FeatureVector {
        let form: HashMap<String, String> = FEATURE_NAMES
            .iter()
            .map(|name| (name.to_string(), "1".to_string()))
            .collect();
        FeatureVector::from_form(&form).unwrap()
    }

    fn patient_row(id: i32) -> patient::Model {
        patient::Model {
            id,
            created_at: Utc::now(),
            ex_fum: 1.0,
            consum_alcoh: 1.0,
            consum_alcoh_30: 1.0,
            niveldeactividadesemanal: 1.0,
            act_fis_frisk: 1.0,
            diet_frisk: 1.0,
            med_hta_fr: 1.0,
            glu_alta: 1.0,
            parien_dm: 1.0,
            edad: 1.0,
            mets: 1.0,
            sedentarismo: 1.0,
            talla: 1.0,
            peso: 1.0,
            imc: 1.0,
            mme: 1.0,
        }
    }

    fn prediction_row(id: i32, patient_id: i32, proba: f64, label: i32) -> prediction::Model {
        prediction::Model {
            id,
            patient_id,
            predicted_proba: proba,
            predicted_label: label,
            threshold: 0.5,
            created_at: Utc::now(),
        }
    }

    /// Fixed-intercept model yielding sigmoid(ln(p / (1 - p))) == p.
    fn model_with_probability(p: f64) -> RiskModel {
        let contents = serde_json::json!({
            "feature_names": FEATURE_NAMES.to_vec(),
            "mean": vec![0.0f64; FEATURE_NAMES.len()],
            "scale": vec![1.0f64; FEATURE_NAMES.len()],
            "coefficients": vec![0.0f64; FEATURE_NAMES.len()],
            "intercept": (p / (1.0 - p)).ln(),
        })
        .to_string();
        RiskModel::from_json(&contents).unwrap()
    }

    #[tokio::test]
    async fn risky_probability_yields_label_one() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![patient_row(7)]])
            .append_query_results([vec![prediction_row(11, 7, 0.73, 1)]])
            .into_connection();

        let model = model_with_probability(0.73);
        let outcome = score_and_record(&db, Some(&model), &vector_of_ones(), 0.5)
            .await
            .unwrap();

        assert_eq!(outcome.patient_id, 7);
        assert!((outcome.proba - 0.73).abs() < 1e-9);
        assert_eq!(outcome.label, 1);
        assert_eq!(outcome.threshold, 0.5);
        assert_eq!(outcome.label_text(), "RISKY");
    }

    #[tokio::test]
    async fn probability_below_threshold_yields_label_zero() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![patient_row(1)]])
            .append_query_results([vec![prediction_row(1, 1, 0.31, 0)]])
            .into_connection();

        let model = model_with_probability(0.31);
        let outcome = score_and_record(&db, Some(&model), &vector_of_ones(), 0.5)
            .await
            .unwrap();

        assert_eq!(outcome.label, 0);
        assert_eq!(outcome.label_text(), "NOT RISKY");
    }

    #[tokio::test]
    async fn probability_equal_to_threshold_is_risky() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![patient_row(2)]])
            .append_query_results([vec![prediction_row(2, 2, 0.5, 1)]])
            .into_connection();

        let model = model_with_probability(0.5);
        let outcome = score_and_record(&db, Some(&model), &vector_of_ones(), 0.5)
            .await
            .unwrap();

        assert_eq!(outcome.label, 1);
    }

    #[tokio::test]
    async fn unavailable_model_persists_degraded_result() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![patient_row(3)]])
            .append_query_results([vec![prediction_row(4, 3, 0.0, 0)]])
            .into_connection();

        let outcome = score_and_record(&db, None, &vector_of_ones(), 0.5)
            .await
            .unwrap();

        assert_eq!(outcome.proba, 0.0);
        assert_eq!(outcome.label, 0);
        assert_eq!(outcome.label_text(), "NOT RISKY");
        assert_eq!(outcome.patient_id, 3);
    }

    #[tokio::test]
    async fn prediction_insert_failure_propagates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![patient_row(5)]])
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();

        let model = model_with_probability(0.9);
        let result = score_and_record(&db, Some(&model), &vector_of_ones(), 0.5).await;

        assert!(result.is_err());
    }
}
