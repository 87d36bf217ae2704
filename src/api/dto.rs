use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::models::{Plant, SensorReading},
    health::HealthAnalysis,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SensorReadingDto {
    pub id: Uuid,
    pub plant_id: Uuid,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percentage.
    pub humidity: f64,
    /// Lux.
    pub light: f64,
    /// Percentage.
    pub soil_moisture: f64,
    pub recorded_at: DateTime<Utc>,
}

impl From<SensorReading> for SensorReadingDto {
    fn from(r: SensorReading) -> Self {
        Self {
            id: r.id,
            plant_id: r.plant_id,
            temperature: r.temperature,
            humidity: r.humidity,
            light: r.light,
            soil_moisture: r.soil_moisture,
            recorded_at: r.recorded_at,
        }
    }
}

/// List-view plant: identity fields plus the latest reading and a freshly
/// computed health analysis.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlantDto {
    pub id: Uuid,
    pub name: String,
    pub scientific_name: Option<String>,
    pub species_description: Option<String>,
    pub identification_confidence: Option<f64>,
    pub location: Option<String>,
    /// MIME type of the stored photo; `null` when no photo was uploaded.
    pub image_mime: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_reading: Option<SensorReadingDto>,
    pub health: HealthAnalysis,
}

impl PlantDto {
    pub fn new(plant: Plant, last_reading: Option<SensorReadingDto>, health: HealthAnalysis) -> Self {
        Self {
            id: plant.id,
            name: plant.name,
            scientific_name: plant.scientific_name,
            species_description: plant.species_description,
            identification_confidence: plant.identification_confidence,
            location: plant.location,
            image_mime: plant.image_mime,
            created_at: plant.created_at,
            last_reading,
            health,
        }
    }
}

/// Detail-view plant: everything in [`PlantDto`] plus reading history
/// (last 30 readings, ascending by time).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlantDetailDto {
    #[serde(flatten)]
    pub plant: PlantDto,
    pub historical_readings: Vec<SensorReadingDto>,
}

/// Request body for `POST /plants`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePlantRequest {
    /// Display name. When omitted and a photo is supplied, the identified
    /// common name is used instead.
    pub name: Option<String>,
    pub location: Option<String>,
    /// Photo as a base64 data URL (`data:image/jpeg;base64,…`). Optional:
    /// plants can be registered without a photo and identified later.
    pub image_data: Option<String>,
}

/// Request body for `PUT /plants/{id}/image`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateImageRequest {
    /// Photo as a base64 data URL.
    pub image_data: String,
}

/// Response for `POST /plants/{id}/readings/refresh`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadingWithHealthDto {
    pub reading: SensorReadingDto,
    pub health: HealthAnalysis,
}
