use std::collections::HashSet;

use sqlx::PgPool;

use crate::dto::schedule::RosterEntry;
use crate::error::Result;
use crate::models::DriverNumber;

pub struct RosterRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RosterRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn driver_numbers(&self, season: i32) -> Result<HashSet<DriverNumber>> {
        let numbers = sqlx::query_scalar::<_, i32>(
            "SELECT driver_number FROM season_drivers WHERE season = $1",
        )
        .bind(season)
        .fetch_all(self.pool)
        .await?;

        Ok(numbers.into_iter().map(DriverNumber).collect())
    }

    pub async fn upsert(&self, season: i32, driver: &RosterEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO season_drivers (season, driver_number, driver_name, team)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (season, driver_number)
            DO UPDATE SET
                driver_name = EXCLUDED.driver_name,
                team = EXCLUDED.team
            "#,
        )
        .bind(season)
        .bind(driver.driver_number)
        .bind(&driver.driver_name)
        .bind(&driver.team)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
