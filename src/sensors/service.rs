//! Simulated environmental sensors.
//!
//! No hardware integration exists; readings are drawn from plausible ranges
//! per plant on a fixed interval, persisted, and pushed into the shared
//! latest-reading cache.

use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use sqlx::PgPool;
use tokio::time;
use tracing::{error, info};
use uuid::Uuid;

use crate::{db::models::SensorReading, reading_cache::ReadingCache};

/// Raw sampled values before persistence assigns an id and timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SensorSample {
    pub temperature: f64,
    pub humidity: f64,
    pub light: f64,
    pub soil_moisture: f64,
}

/// Draw one plausible indoor reading.
///
/// Ranges deliberately overlap the warning thresholds so simulated plants
/// drift between statuses: 15–30 °C, 30–70 %, 1000–9000 lx, 20–80 %.
pub(crate) fn generate_sample<R: Rng + ?Sized>(rng: &mut R) -> SensorSample {
    SensorSample {
        temperature: round1(rng.gen_range(15.0..=30.0)),
        humidity: rng.gen_range(30.0_f64..=70.0).round(),
        light: rng.gen_range(1000.0_f64..=9000.0).round(),
        soil_moisture: rng.gen_range(20.0_f64..=80.0).round(),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Sample a fresh reading for `plant_id`, persist it, and update the cache.
pub async fn record_reading(
    pool: &PgPool,
    cache: &ReadingCache,
    plant_id: Uuid,
) -> Result<SensorReading> {
    let sample = generate_sample(&mut rand::thread_rng());

    let reading = sqlx::query_as::<_, SensorReading>(
        r#"
        INSERT INTO sensor_readings (plant_id, temperature, humidity, light, soil_moisture)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, plant_id, temperature, humidity, light, soil_moisture, recorded_at
        "#,
    )
    .bind(plant_id)
    .bind(sample.temperature)
    .bind(sample.humidity)
    .bind(sample.light)
    .bind(sample.soil_moisture)
    .fetch_one(pool)
    .await?;

    cache.update(reading.clone()).await;
    Ok(reading)
}

pub struct ReadingSimulator {
    pool: PgPool,
    cache: ReadingCache,
    interval: Duration,
}

impl ReadingSimulator {
    pub fn new(pool: PgPool, cache: ReadingCache, interval_secs: u64) -> Self {
        Self {
            pool,
            cache,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Runs the sampling loop indefinitely.
    /// Spawn this via `tokio::spawn`.
    pub async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "Reading simulation loop started");
        let mut ticker = time::interval(self.interval);

        loop {
            ticker.tick().await;
            if let Err(e) = self.run_once().await {
                error!(error = %e, "Reading simulation iteration failed");
            }
        }
    }

    async fn run_once(&self) -> Result<()> {
        let plant_ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM plants")
            .fetch_all(&self.pool)
            .await?;

        if plant_ids.is_empty() {
            info!("No plants registered yet; skipping sampling iteration");
            return Ok(());
        }

        for plant_id in plant_ids {
            if let Err(e) = record_reading(&self.pool, &self.cache, plant_id).await {
                error!(plant_id = %plant_id, error = %e, "Failed to record simulated reading");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn samples_stay_in_documented_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let s = generate_sample(&mut rng);
            assert!((15.0..=30.0).contains(&s.temperature));
            assert!((30.0..=70.0).contains(&s.humidity));
            assert!((1000.0..=9000.0).contains(&s.light));
            assert!((20.0..=80.0).contains(&s.soil_moisture));
        }
    }

    #[test]
    fn temperature_has_one_decimal_place() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let t = generate_sample(&mut rng).temperature;
            assert_eq!((t * 10.0).round() / 10.0, t);
        }
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let a = generate_sample(&mut StdRng::seed_from_u64(5));
        let b = generate_sample(&mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
