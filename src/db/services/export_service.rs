use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement};

/// Column order is part of the export contract; downstream scripts parse it.
pub const CSV_HEADER: &str = "id,created_at,edad,peso,imc,proba,label,predicted_at";

const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One (patient, prediction) pair of the full join: every prediction a
/// patient ever received, not just the latest.
#[derive(FromQueryResult, Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub edad: f64,
    pub peso: f64,
    pub imc: f64,
    pub predicted_proba: f64,
    pub predicted_label: i32,
    pub predicted_at: DateTime<Utc>,
}

/// Fetches the full patient ⋈ prediction join, newest prediction first.
pub async fn export_rows(db: &DatabaseConnection) -> Result<Vec<ExportRow>, DbErr> {
    ExportRow::find_by_statement(Statement::from_string(
        DbBackend::Postgres,
        r#"
        SELECT p.id, p.created_at, p.edad, p.peso, p.imc,
               pr.predicted_proba, pr.predicted_label,
               pr.created_at AS predicted_at
        FROM patients p
        JOIN predictions pr ON pr.patient_id = p.id
        ORDER BY pr.created_at DESC, pr.id DESC
        "#,
    ))
    .all(db)
    .await
}

/// Renders the rows as CSV with the fixed header. Pure; byte-stable column
/// order across calls.
pub fn render_csv(rows: &[ExportRow]) -> String {
    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{:.4},{},{}",
            row.id,
            row.created_at.format(EXPORT_TIME_FORMAT),
            row.edad,
            row.peso,
            row.imc,
            row.predicted_proba,
            row.predicted_label,
            row.predicted_at.format(EXPORT_TIME_FORMAT),
        );
    }
    out
}
