use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::observations;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = observations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // created_at is only read by operators
pub struct ObservationRow {
    pub id: Uuid,
    pub target: String,
    pub target_key: String,
    pub observed_at: DateTime<Utc>,
    pub observer: String,
    pub notes: Option<String>,
    pub encrypted_location_payload: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = observations)]
pub struct NewObservationRow {
    pub id: Uuid,
    pub target: String,
    pub target_key: String,
    pub observed_at: DateTime<Utc>,
    pub observer: String,
    pub notes: Option<String>,
    pub encrypted_location_payload: String,
}
