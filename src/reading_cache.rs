use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::SensorReading;

/// In-memory store of the most recent `SensorReading` per plant.
///
/// Wrapped in `Arc` so it can be cheaply cloned and shared across tasks.
/// Uses `tokio::sync::RwLock` so concurrent readers never block each other.
#[derive(Clone, Default)]
pub struct ReadingCache {
    inner: Arc<RwLock<HashMap<Uuid, SensorReading>>>,
}

impl ReadingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cached reading for `reading.plant_id`.
    pub async fn update(&self, reading: SensorReading) {
        self.inner.write().await.insert(reading.plant_id, reading);
    }

    /// Latest reading for one plant, if any has been recorded.
    pub async fn get(&self, plant_id: Uuid) -> Option<SensorReading> {
        self.inner.read().await.get(&plant_id).cloned()
    }

    /// Replace the cache contents with readings loaded from the database.
    /// Called once at startup so handlers see data from previous runs.
    pub async fn warm(&self, readings: Vec<SensorReading>) {
        let mut guard = self.inner.write().await;
        guard.clear();
        for reading in readings {
            guard.insert(reading.plant_id, reading);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn make_reading(plant_id: Uuid, temperature: f64) -> SensorReading {
        SensorReading {
            id: Uuid::new_v4(),
            plant_id,
            temperature,
            humidity: 55.0,
            light: 4000.0,
            soil_moisture: 50.0,
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn empty_cache_returns_nothing() {
        let cache = ReadingCache::new();
        assert!(cache.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn update_and_get_single_reading() {
        let cache = ReadingCache::new();
        let plant = Uuid::new_v4();
        cache.update(make_reading(plant, 21.5)).await;

        let got = cache.get(plant).await.unwrap();
        assert_eq!(got.plant_id, plant);
        assert_eq!(got.temperature, 21.5);
    }

    #[tokio::test]
    async fn update_overwrites_previous_reading() {
        let cache = ReadingCache::new();
        let plant = Uuid::new_v4();
        cache.update(make_reading(plant, 20.0)).await;
        cache.update(make_reading(plant, 25.0)).await;

        assert_eq!(cache.get(plant).await.unwrap().temperature, 25.0);
    }

    #[tokio::test]
    async fn different_plants_are_separate_entries() {
        let cache = ReadingCache::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        cache.update(make_reading(a, 20.0)).await;
        cache.update(make_reading(b, 30.0)).await;

        assert_eq!(cache.get(a).await.unwrap().temperature, 20.0);
        assert_eq!(cache.get(b).await.unwrap().temperature, 30.0);
    }

    #[tokio::test]
    async fn warm_replaces_contents() {
        let cache = ReadingCache::new();
        let stale = Uuid::new_v4();
        let fresh = Uuid::new_v4();
        cache.update(make_reading(stale, 19.0)).await;

        cache.warm(vec![make_reading(fresh, 23.0)]).await;

        assert!(cache.get(stale).await.is_none());
        assert_eq!(cache.get(fresh).await.unwrap().temperature, 23.0);
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let cache = ReadingCache::new();
        let clone = cache.clone();
        let plant = Uuid::new_v4();

        cache.update(make_reading(plant, 22.0)).await;

        let got = clone.get(plant).await.unwrap();
        assert_eq!(got.temperature, 22.0);
    }
}
