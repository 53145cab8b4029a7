use super::{DBClient, timed};
use crate::dtos::RecordStatsDto;
use crate::models::HealthRecord;
use chrono::NaiveDate;

const RECORD_COLUMNS: &str = "id, user_id, calories, steps, mvpa, sleep, date, notes";

/// Health record database operations trait
///
/// The table is an append-only log: nothing enforces one row per (user, date),
/// and readers that want "the" record for a day take the most recently
/// inserted one. That read rule is deliberate and load-bearing; see
/// `latest_stats`.
pub trait HealthExt {
    /// Insert one metrics row. Absent fields land as NULL.
    async fn insert_stats(
        &self,
        user_id: i64,
        stats: &RecordStatsDto,
    ) -> Result<HealthRecord, sqlx::Error>;

    /// Most recently inserted row for the user, by insertion order (id DESC),
    /// not by date. None when the user has no records.
    async fn latest_stats(&self, user_id: i64) -> Result<Option<HealthRecord>, sqlx::Error>;

    /// All rows for the user on a given date, oldest first. Empty is a normal
    /// result, not an error.
    async fn stats_for_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<HealthRecord>, sqlx::Error>;

    /// Full history for the profile page.
    async fn stats_for_user(&self, user_id: i64) -> Result<Vec<HealthRecord>, sqlx::Error>;

    /// Set the notes text on every row matching the date. Scoped by date
    /// alone, matching the calendar page contract. Returns the number of rows
    /// touched; zero means no record exists for that date.
    async fn update_notes(&self, date: NaiveDate, notes: &str) -> Result<u64, sqlx::Error>;
}

impl HealthExt for DBClient {
    async fn insert_stats(
        &self,
        user_id: i64,
        stats: &RecordStatsDto,
    ) -> Result<HealthRecord, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO health_stats (user_id, calories, steps, mvpa, sleep, date, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {RECORD_COLUMNS}
            "#
        );

        let record = timed(
            sqlx::query_as::<_, HealthRecord>(&query)
                .bind(user_id)
                .bind(stats.calories)
                .bind(stats.steps)
                .bind(stats.mvpa)
                .bind(stats.sleep)
                .bind(stats.date)
                .bind(stats.notes.as_deref())
                .fetch_one(&self.pool),
        )
        .await?;

        Ok(record)
    }

    async fn latest_stats(&self, user_id: i64) -> Result<Option<HealthRecord>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM health_stats
            WHERE user_id = ?
            ORDER BY id DESC
            LIMIT 1
            "#
        );

        let record = timed(
            sqlx::query_as::<_, HealthRecord>(&query)
                .bind(user_id)
                .fetch_optional(&self.pool),
        )
        .await?;

        Ok(record)
    }

    async fn stats_for_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<HealthRecord>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM health_stats
            WHERE user_id = ? AND date = ?
            ORDER BY id
            "#
        );

        let records = timed(
            sqlx::query_as::<_, HealthRecord>(&query)
                .bind(user_id)
                .bind(date)
                .fetch_all(&self.pool),
        )
        .await?;

        Ok(records)
    }

    async fn stats_for_user(&self, user_id: i64) -> Result<Vec<HealthRecord>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM health_stats
            WHERE user_id = ?
            ORDER BY id
            "#
        );

        let records = timed(
            sqlx::query_as::<_, HealthRecord>(&query)
                .bind(user_id)
                .fetch_all(&self.pool),
        )
        .await?;

        Ok(records)
    }

    async fn update_notes(&self, date: NaiveDate, notes: &str) -> Result<u64, sqlx::Error> {
        let result = timed(
            sqlx::query("UPDATE health_stats SET notes = ? WHERE date = ?")
                .bind(notes)
                .bind(date)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }
}
