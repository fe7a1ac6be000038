use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{League, LeagueMember};

#[derive(FromRow)]
struct LeagueRow {
    league_id: Uuid,
    name: String,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
}

/// Repository for leagues and their memberships
pub struct LeagueRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeagueRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, league_id: Uuid) -> Result<Option<League>> {
        let row = sqlx::query_as::<_, LeagueRow>(
            r#"
            SELECT league_id, name, owner_id, created_at
            FROM leagues
            WHERE league_id = $1
            "#,
        )
        .bind(league_id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.with_members(row).await?)),
            None => Ok(None),
        }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<League>> {
        let rows = sqlx::query_as::<_, LeagueRow>(
            r#"
            SELECT l.league_id, l.name, l.owner_id, l.created_at
            FROM leagues l
            INNER JOIN league_members lm ON lm.league_id = l.league_id
            WHERE lm.user_id = $1
            ORDER BY l.name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut leagues = Vec::with_capacity(rows.len());
        for row in rows {
            leagues.push(self.with_members(row).await?);
        }

        Ok(leagues)
    }

    /// Inserts the league together with its initial members
    pub async fn create(&self, league: &League) -> Result<League> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO leagues (league_id, name, owner_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(league.league_id)
        .bind(&league.name)
        .bind(league.owner_id)
        .bind(league.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match StorageError::from(e) {
            err if err.is_unique_violation() => {
                StorageError::ConstraintViolation("League name already exists".to_string())
            }
            err => err,
        })?;

        for member in &league.members {
            sqlx::query(
                r#"
                INSERT INTO league_members (league_id, user_id, joined_at)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(league.league_id)
            .bind(member.user_id)
            .bind(member.joined_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(league.clone())
    }

    pub async fn add_member(&self, league_id: Uuid, member: &LeagueMember) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO league_members (league_id, user_id, joined_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (league_id, user_id) DO NOTHING
            "#,
        )
        .bind(league_id)
        .bind(member.user_id)
        .bind(member.joined_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove_member(&self, league_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM league_members
            WHERE league_id = $1 AND user_id = $2
            "#,
        )
        .bind(league_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn with_members(&self, row: LeagueRow) -> Result<League> {
        let members = sqlx::query_as::<_, LeagueMember>(
            r#"
            SELECT user_id, joined_at
            FROM league_members
            WHERE league_id = $1
            ORDER BY joined_at, user_id
            "#,
        )
        .bind(row.league_id)
        .fetch_all(self.pool)
        .await?;

        Ok(League {
            league_id: row.league_id,
            name: row.name,
            owner_id: row.owner_id,
            created_at: row.created_at,
            members,
        })
    }
}
