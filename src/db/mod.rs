pub mod models;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use self::models::SensorReading;

pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Latest reading per plant, used to warm the in-memory cache at startup.
pub async fn load_latest_readings(pool: &PgPool) -> Result<Vec<SensorReading>> {
    let rows = sqlx::query_as::<_, SensorReading>(
        r#"
        SELECT DISTINCT ON (plant_id)
            id, plant_id, temperature, humidity, light, soil_moisture, recorded_at
        FROM sensor_readings
        ORDER BY plant_id, recorded_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
