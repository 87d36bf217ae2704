use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use utoipa::OpenApi;
use uuid::Uuid;

use super::{
    dto::{
        CreatePlantRequest, PlantDetailDto, PlantDto, ReadingWithHealthDto, SensorReadingDto,
        UpdateImageRequest,
    },
    errors::AppError,
    AppState,
};
use crate::{
    db::models::{Plant, SensorReading},
    health::{self, HealthAnalysis, HealthStatus},
    sensors,
    vision::models::{EncodedImage, IdentificationResult},
};

/// Reading history returned by the detail endpoint.
const HISTORY_LIMIT: i64 = 30;

const PLANT_COLUMNS: &str = "id, name, scientific_name, species_description, \
                             identification_confidence, location, image_mime, created_at";

// ---------------------------------------------------------------------------
// Queries shared between handlers
// ---------------------------------------------------------------------------

async fn fetch_plant(state: &AppState, id: Uuid) -> Result<Plant, AppError> {
    sqlx::query_as::<_, Plant>(&format!("SELECT {PLANT_COLUMNS} FROM plants WHERE id = $1"))
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("plant {id} not found")))
}

/// Health for a plant given its latest reading, or the permissive no-data
/// default when none has been recorded yet.
fn analyse(plant: &Plant, latest: Option<&SensorReading>) -> Result<HealthAnalysis, AppError> {
    match latest {
        Some(reading) => Ok(health::evaluate_health(reading, plant.species_label())?),
        None => Ok(HealthAnalysis::no_data()),
    }
}

// ---------------------------------------------------------------------------
// Plant handlers
// ---------------------------------------------------------------------------

/// List all plants with their latest reading and a fresh health analysis.
#[utoipa::path(
    get,
    path = "/plants",
    responses(
        (status = 200, description = "All registered plants", body = Vec<PlantDto>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "plants"
)]
pub async fn list_plants(State(state): State<AppState>) -> Result<Json<Vec<PlantDto>>, AppError> {
    let plants =
        sqlx::query_as::<_, Plant>(&format!("SELECT {PLANT_COLUMNS} FROM plants ORDER BY created_at"))
            .fetch_all(&state.pool)
            .await?;

    let mut out = Vec::with_capacity(plants.len());
    for plant in plants {
        let latest = state.cache.get(plant.id).await;
        let health = analyse(&plant, latest.as_ref())?;
        out.push(PlantDto::new(plant, latest.map(Into::into), health));
    }
    Ok(Json(out))
}

/// Register a new plant. When a photo is supplied, the identification
/// pipeline seeds the species fields; identification never fails, so neither
/// does creation because of it.
#[utoipa::path(
    post,
    path = "/plants",
    request_body = CreatePlantRequest,
    responses(
        (status = 201, description = "Plant created", body = PlantDetailDto),
        (status = 400, description = "Malformed image payload"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "plants"
)]
pub async fn create_plant(
    State(state): State<AppState>,
    Json(req): Json<CreatePlantRequest>,
) -> Result<(StatusCode, Json<PlantDetailDto>), AppError> {
    let identified = match req.image_data.as_deref() {
        Some(data_url) => {
            let image = EncodedImage::from_data_url(data_url)?;
            let result = state.vision.identify(&image).await;
            Some((image, result))
        }
        None => None,
    };

    let name = req
        .name
        .clone()
        .or_else(|| identified.as_ref().map(|(_, r)| r.common_name.clone()))
        .unwrap_or_else(|| "Unknown Plant".to_owned());

    let (image, result) = match identified {
        Some((image, result)) => (Some(image), Some(result)),
        None => (None, None),
    };

    let plant = sqlx::query_as::<_, Plant>(&format!(
        r#"
        INSERT INTO plants
            (name, scientific_name, species_description, identification_confidence,
             location, image_data, image_mime)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {PLANT_COLUMNS}
        "#
    ))
    .bind(&name)
    .bind(result.as_ref().map(|r| r.scientific_name.clone()))
    .bind(result.as_ref().map(|r| r.description.clone()))
    .bind(result.as_ref().map(|r| r.confidence))
    .bind(&req.location)
    .bind(image.as_ref().map(|i| i.data.clone()))
    .bind(image.as_ref().map(|i| i.mime_type.clone()))
    .fetch_one(&state.pool)
    .await?;

    let detail = PlantDetailDto {
        plant: PlantDto::new(plant, None, HealthAnalysis::no_data()),
        historical_readings: vec![],
    };
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Fetch one plant with reading history and a fresh health analysis.
#[utoipa::path(
    get,
    path = "/plants/{id}",
    params(("id" = Uuid, Path, description = "Plant ID")),
    responses(
        (status = 200, description = "Plant detail", body = PlantDetailDto),
        (status = 404, description = "Plant not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "plants"
)]
pub async fn get_plant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlantDetailDto>, AppError> {
    let plant = fetch_plant(&state, id).await?;

    let mut history = sqlx::query_as::<_, SensorReading>(
        r#"
        SELECT id, plant_id, temperature, humidity, light, soil_moisture, recorded_at
        FROM sensor_readings
        WHERE plant_id = $1
        ORDER BY recorded_at DESC
        LIMIT $2
        "#,
    )
    .bind(id)
    .bind(HISTORY_LIMIT)
    .fetch_all(&state.pool)
    .await?;
    history.reverse();

    let latest = history.last().cloned();
    let health = analyse(&plant, latest.as_ref())?;

    Ok(Json(PlantDetailDto {
        plant: PlantDto::new(plant, latest.map(Into::into), health),
        historical_readings: history.into_iter().map(Into::into).collect(),
    }))
}

// ---------------------------------------------------------------------------
// Image handlers
// ---------------------------------------------------------------------------

/// Serve the stored plant photo.
#[utoipa::path(
    get,
    path = "/plants/{id}/image",
    params(("id" = Uuid, Path, description = "Plant ID")),
    responses(
        (status = 200, description = "Image bytes", body = Vec<u8>, content_type = "image/jpeg"),
        (status = 404, description = "Plant or image not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "plants"
)]
pub async fn get_plant_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row: Option<(Option<Vec<u8>>, Option<String>)> =
        sqlx::query_as("SELECT image_data, image_mime FROM plants WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.pool)
            .await?;

    let (data, mime) = row.ok_or_else(|| AppError::NotFound(format!("plant {id} not found")))?;
    let data = data.ok_or_else(|| AppError::NotFound(format!("plant {id} has no image")))?;
    let mime = mime.unwrap_or_else(|| "image/jpeg".to_owned());

    Ok((
        [
            (header::CONTENT_TYPE, mime),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_owned(),
            ),
        ],
        data,
    ))
}

/// Replace the plant photo and re-run species identification.
///
/// Species identity is otherwise immutable; submitting a new photo is the
/// only way it gets re-derived.
#[utoipa::path(
    put,
    path = "/plants/{id}/image",
    params(("id" = Uuid, Path, description = "Plant ID")),
    request_body = UpdateImageRequest,
    responses(
        (status = 200, description = "New identification", body = IdentificationResult),
        (status = 400, description = "Malformed image payload"),
        (status = 404, description = "Plant not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "plants"
)]
pub async fn update_plant_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateImageRequest>,
) -> Result<Json<IdentificationResult>, AppError> {
    fetch_plant(&state, id).await?;

    let image = EncodedImage::from_data_url(&req.image_data)?;
    let result = state.vision.identify(&image).await;

    sqlx::query(
        r#"
        UPDATE plants
        SET image_data = $2,
            image_mime = $3,
            scientific_name = $4,
            species_description = $5,
            identification_confidence = $6
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&image.data)
    .bind(&image.mime_type)
    .bind(&result.scientific_name)
    .bind(&result.description)
    .bind(result.confidence)
    .execute(&state.pool)
    .await?;

    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Reading handlers
// ---------------------------------------------------------------------------

/// Full ascending reading history for one plant.
#[utoipa::path(
    get,
    path = "/plants/{id}/readings",
    params(("id" = Uuid, Path, description = "Plant ID")),
    responses(
        (status = 200, description = "Readings ordered by recorded_at ASC", body = Vec<SensorReadingDto>),
        (status = 404, description = "Plant not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "readings"
)]
pub async fn get_readings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SensorReadingDto>>, AppError> {
    fetch_plant(&state, id).await?;

    let rows = sqlx::query_as::<_, SensorReading>(
        r#"
        SELECT id, plant_id, temperature, humidity, light, soil_moisture, recorded_at
        FROM sensor_readings
        WHERE plant_id = $1
        ORDER BY recorded_at ASC
        "#,
    )
    .bind(id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Record a fresh simulated reading now and return it with its analysis.
#[utoipa::path(
    post,
    path = "/plants/{id}/readings/refresh",
    params(("id" = Uuid, Path, description = "Plant ID")),
    responses(
        (status = 200, description = "New reading and health analysis", body = ReadingWithHealthDto),
        (status = 404, description = "Plant not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "readings"
)]
pub async fn refresh_reading(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReadingWithHealthDto>, AppError> {
    let plant = fetch_plant(&state, id).await?;

    let reading = sensors::record_reading(&state.pool, &state.cache, id).await?;
    let health = health::evaluate_health(&reading, plant.species_label())?;

    Ok(Json(ReadingWithHealthDto {
        reading: reading.into(),
        health,
    }))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        list_plants,
        create_plant,
        get_plant,
        get_plant_image,
        update_plant_image,
        get_readings,
        refresh_reading,
        health,
    ),
    components(schemas(
        PlantDto,
        PlantDetailDto,
        SensorReadingDto,
        CreatePlantRequest,
        UpdateImageRequest,
        ReadingWithHealthDto,
        IdentificationResult,
        HealthAnalysis,
        HealthStatus,
    )),
    tags(
        (name = "plants",   description = "Plant registry and identification endpoints"),
        (name = "readings", description = "Sensor reading endpoints"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Plant Sensor Service API",
        version = "0.1.0",
        description = "REST API for houseplant monitoring and species identification"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
