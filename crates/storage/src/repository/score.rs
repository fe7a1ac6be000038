use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Score, ScoreComponents};

#[derive(FromRow)]
struct ScoreRow {
    prediction_id: Uuid,
    user_id: Uuid,
    event_id: Uuid,
    top_five_exact: Decimal,
    lower_five_exact: Decimal,
    perfect_top_ten_bonus: Decimal,
    partial_position: Decimal,
    pole: Decimal,
    sprint: Decimal,
    pit_stops: Decimal,
    fastest_lap: Decimal,
    positions_gained: Decimal,
    streak_bonus: Decimal,
    underdog_bonus: Decimal,
    perfect_top_ten: bool,
    computed_at: DateTime<Utc>,
}

impl From<ScoreRow> for Score {
    fn from(row: ScoreRow) -> Self {
        Self {
            prediction_id: row.prediction_id,
            user_id: row.user_id,
            event_id: row.event_id,
            components: ScoreComponents {
                top_five_exact: row.top_five_exact,
                lower_five_exact: row.lower_five_exact,
                perfect_top_ten_bonus: row.perfect_top_ten_bonus,
                partial_position: row.partial_position,
                pole: row.pole,
                sprint: row.sprint,
                pit_stops: row.pit_stops,
                fastest_lap: row.fastest_lap,
                positions_gained: row.positions_gained,
                streak_bonus: row.streak_bonus,
                underdog_bonus: row.underdog_bonus,
                perfect_top_ten: row.perfect_top_ten,
            },
            computed_at: row.computed_at,
        }
    }
}

/// Repository for computed prediction scores
pub struct ScoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoreRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Swaps the event's scores for `scores` inside one transaction.
    ///
    /// `total` is stored for ad-hoc SQL reporting and is never read back.
    pub async fn replace_for_event(&self, event_id: Uuid, scores: &[Score]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM prediction_scores WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        for score in scores {
            let c = &score.components;
            sqlx::query(
                r#"
                INSERT INTO prediction_scores (
                    prediction_id, user_id, event_id,
                    top_five_exact, lower_five_exact, perfect_top_ten_bonus, partial_position,
                    pole, sprint, pit_stops, fastest_lap, positions_gained,
                    streak_bonus, underdog_bonus, perfect_top_ten, total, computed_at
                )
                VALUES (
                    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17
                )
                "#,
            )
            .bind(score.prediction_id)
            .bind(score.user_id)
            .bind(score.event_id)
            .bind(c.top_five_exact)
            .bind(c.lower_five_exact)
            .bind(c.perfect_top_ten_bonus)
            .bind(c.partial_position)
            .bind(c.pole)
            .bind(c.sprint)
            .bind(c.pit_stops)
            .bind(c.fastest_lap)
            .bind(c.positions_gained)
            .bind(c.streak_bonus)
            .bind(c.underdog_bonus)
            .bind(c.perfect_top_ten)
            .bind(score.total())
            .bind(score.computed_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_for_users(&self, user_ids: &[Uuid]) -> Result<Vec<Score>> {
        let rows = sqlx::query_as::<_, ScoreRow>(
            r#"
            SELECT prediction_id, user_id, event_id,
                   top_five_exact, lower_five_exact, perfect_top_ten_bonus, partial_position,
                   pole, sprint, pit_stops, fastest_lap, positions_gained,
                   streak_bonus, underdog_bonus, perfect_top_ten, computed_at
            FROM prediction_scores
            WHERE user_id = ANY($1)
            ORDER BY computed_at, prediction_id
            "#,
        )
        .bind(user_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Score::from).collect())
    }
}
