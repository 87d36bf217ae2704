use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A monitored houseplant.
///
/// The identification fields are `NULL` until a photo has been run through
/// the identification pipeline; `image_data` is intentionally absent here and
/// only fetched by the image endpoint.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Plant {
    pub id: Uuid,
    pub name: String,
    /// Binomial species name (genus + species) from identification.
    pub scientific_name: Option<String>,
    pub species_description: Option<String>,
    /// Classifier confidence, 0–100.
    pub identification_confidence: Option<f64>,
    pub location: Option<String>,
    pub image_mime: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Plant {
    /// Label used in health narratives: the identified species when known,
    /// otherwise the plant's display name.
    pub fn species_label(&self) -> &str {
        self.scientific_name.as_deref().unwrap_or(&self.name)
    }
}

/// A point-in-time environmental snapshot for one plant.
///
/// All four metrics are stored as real numbers in their natural units:
/// temperature in °C, humidity and soil moisture in %, light in lux.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: Uuid,
    pub plant_id: Uuid,
    pub temperature: f64,
    pub humidity: f64,
    pub light: f64,
    pub soil_moisture: f64,
    pub recorded_at: DateTime<Utc>,
}
