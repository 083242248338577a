//! Optional copy of the daily table into a relational database.

use crate::load::error::LoadError;
use crate::types::daily::DailyRecord;
use log::{debug, info};
use sqlx::any::AnyPoolOptions;
use sqlx::{Any, Transaction};

pub const TABLE_NAME: &str = "weather_daily";

const DROP_TABLE: &str = "DROP TABLE IF EXISTS weather_daily";

const CREATE_TABLE: &str = "CREATE TABLE weather_daily (
    city TEXT NOT NULL,
    date TEXT NOT NULL,
    temp_min DOUBLE PRECISION,
    temp_avg DOUBLE PRECISION,
    temp_max DOUBLE PRECISION,
    rh_avg DOUBLE PRECISION,
    precip_sum DOUBLE PRECISION,
    hours BIGINT NOT NULL
)";

const INSERT_ROW: &str = "INSERT INTO weather_daily
    (city, date, temp_min, temp_avg, temp_max, rh_avg, precip_sum, hours)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)";

/// Replaces the `weather_daily` table with `daily` when `db_uri` is set.
///
/// The drop, create and inserts run in a single transaction. Both
/// `postgres://` and `sqlite:` connection strings are accepted. Without a
/// connection string nothing happens.
///
/// # Errors
///
/// Returns [`LoadError::Database`] if connecting or any statement fails; the
/// transaction is then rolled back.
pub async fn write_sql(daily: &[DailyRecord], db_uri: Option<&str>) -> Result<(), LoadError> {
    let Some(db_uri) = db_uri else {
        debug!("No database configured, skipping {}", TABLE_NAME);
        return Ok(());
    };
    let db_err = |source| LoadError::Database {
        table: TABLE_NAME,
        source,
    };

    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect(db_uri)
        .await
        .map_err(db_err)?;

    let mut tx = pool.begin().await.map_err(db_err)?;
    replace_table(&mut tx, daily).await.map_err(db_err)?;
    tx.commit().await.map_err(db_err)?;
    pool.close().await;

    info!("Replaced table {} with {} rows", TABLE_NAME, daily.len());
    Ok(())
}

async fn replace_table(
    tx: &mut Transaction<'_, Any>,
    daily: &[DailyRecord],
) -> Result<(), sqlx::Error> {
    sqlx::query(DROP_TABLE).execute(&mut **tx).await?;
    sqlx::query(CREATE_TABLE).execute(&mut **tx).await?;
    for record in daily {
        sqlx::query(INSERT_ROW)
            .bind(record.city.as_str())
            .bind(record.date.format("%Y-%m-%d").to_string())
            .bind(record.temp_min)
            .bind(record.temp_avg)
            .bind(record.temp_max)
            .bind(record.rh_avg)
            .bind(record.precip_sum)
            .bind(i64::from(record.hours))
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}
