//! SeaORM entities mapping the persisted schema: the two append-only tables
//! and the `latest_predictions` view (see `migrations/init.sql`).

pub mod latest_prediction;
pub mod patient;
pub mod prediction;
