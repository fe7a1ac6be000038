use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{DriverNumber, Prediction, TOP_TEN};

#[derive(FromRow)]
struct PredictionRow {
    prediction_id: Uuid,
    user_id: Uuid,
    event_id: Uuid,
    top_ten: Vec<i32>,
    pole: i32,
    sprint_winner: Option<i32>,
    most_pit_stops: i32,
    fastest_lap: i32,
    most_positions_gained: i32,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<PredictionRow> for Prediction {
    type Error = StorageError;

    fn try_from(row: PredictionRow) -> Result<Self> {
        let drivers: Vec<DriverNumber> = row.top_ten.into_iter().map(DriverNumber).collect();
        let top_ten: [DriverNumber; TOP_TEN] = drivers.try_into().map_err(|v: Vec<_>| {
            StorageError::InvalidRow(format!(
                "prediction {} has {} top ten entries",
                row.prediction_id,
                v.len()
            ))
        })?;

        Ok(Self {
            prediction_id: row.prediction_id,
            user_id: row.user_id,
            event_id: row.event_id,
            top_ten,
            pole: DriverNumber(row.pole),
            sprint_winner: row.sprint_winner.map(DriverNumber),
            most_pit_stops: DriverNumber(row.most_pit_stops),
            fastest_lap: DriverNumber(row.fastest_lap),
            most_positions_gained: DriverNumber(row.most_positions_gained),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for user predictions
pub struct PredictionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PredictionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: Uuid, event_id: Uuid) -> Result<Option<Prediction>> {
        let row = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT prediction_id, user_id, event_id, top_ten, pole, sprint_winner,
                   most_pit_stops, fastest_lap, most_positions_gained, created_at, updated_at
            FROM predictions
            WHERE user_id = $1 AND event_id = $2
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Prediction::try_from).transpose()
    }

    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Prediction>> {
        let rows = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT prediction_id, user_id, event_id, top_ten, pole, sprint_winner,
                   most_pit_stops, fastest_lap, most_positions_gained, created_at, updated_at
            FROM predictions
            WHERE event_id = $1
            ORDER BY created_at, prediction_id
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Prediction::try_from).collect()
    }

    /// Single-statement upsert on (user_id, event_id); the first write's id and
    /// creation time survive later edits.
    pub async fn upsert(&self, prediction: &Prediction) -> Result<Prediction> {
        let top_ten: Vec<i32> = prediction.top_ten.iter().map(|d| d.0).collect();

        let row = sqlx::query_as::<_, PredictionRow>(
            r#"
            INSERT INTO predictions (
                prediction_id, user_id, event_id, top_ten, pole, sprint_winner,
                most_pit_stops, fastest_lap, most_positions_gained, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id, event_id)
            DO UPDATE SET
                top_ten = EXCLUDED.top_ten,
                pole = EXCLUDED.pole,
                sprint_winner = EXCLUDED.sprint_winner,
                most_pit_stops = EXCLUDED.most_pit_stops,
                fastest_lap = EXCLUDED.fastest_lap,
                most_positions_gained = EXCLUDED.most_positions_gained,
                updated_at = COALESCE(EXCLUDED.updated_at, EXCLUDED.created_at)
            RETURNING prediction_id, user_id, event_id, top_ten, pole, sprint_winner,
                      most_pit_stops, fastest_lap, most_positions_gained, created_at, updated_at
            "#,
        )
        .bind(prediction.prediction_id)
        .bind(prediction.user_id)
        .bind(prediction.event_id)
        .bind(top_ten)
        .bind(prediction.pole.0)
        .bind(prediction.sprint_winner.map(|d| d.0))
        .bind(prediction.most_pit_stops.0)
        .bind(prediction.fastest_lap.0)
        .bind(prediction.most_positions_gained.0)
        .bind(prediction.created_at)
        .bind(prediction.updated_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match StorageError::from(e) {
            err if err.is_foreign_key_violation() => {
                StorageError::ConstraintViolation("Event does not exist".to_string())
            }
            err => err,
        })?;

        Prediction::try_from(row)
    }
}
