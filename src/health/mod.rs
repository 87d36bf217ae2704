pub mod aggregator;
pub mod evaluator;

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::SensorReading;

pub use evaluator::ReadingError;

/// Overall plant condition tier, ordered by severity (`Excellent` best).
///
/// The derived `Ord` is the escalation order: combining two statuses with
/// [`HealthStatus::worse`] can never improve a verdict, which is what keeps
/// the aggregation monotonic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Return the more severe of `self` and `other`.
    pub fn worse(self, other: Self) -> Self {
        self.max(other)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Excellent => "excellent",
            HealthStatus::Good => "good",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Derived assessment of one sensor reading. Recomputed on every request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthAnalysis {
    pub status: HealthStatus,
    pub needs_water: bool,
    pub needs_light: bool,
    /// Action strings in fixed evaluation order:
    /// moisture, light, temperature, humidity, closing remark.
    pub recommendations: Vec<String>,
    /// Narrative paragraph restating the facts above.
    pub narrative: String,
}

impl HealthAnalysis {
    /// Assessment reported when a plant has no readings yet. Absence of data
    /// is the permissive default, never a critical condition.
    pub fn no_data() -> Self {
        Self {
            status: HealthStatus::Good,
            needs_water: false,
            needs_light: false,
            recommendations: Vec::new(),
            narrative: "No sensor data recorded yet. Analysis will appear after the first reading."
                .to_owned(),
        }
    }
}

/// Evaluate a reading into a full [`HealthAnalysis`].
///
/// Fails only on a malformed reading (non-finite field), which indicates an
/// upstream data-integrity bug rather than a transient condition.
pub fn evaluate_health(
    reading: &SensorReading,
    species_label: &str,
) -> Result<HealthAnalysis, ReadingError> {
    let verdicts = evaluator::evaluate(reading)?;
    Ok(aggregator::aggregate(reading, &verdicts, species_label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::SensorReading;
    use chrono::Utc;
    use uuid::Uuid;

    pub(crate) fn reading(
        temperature: f64,
        humidity: f64,
        light: f64,
        soil_moisture: f64,
    ) -> SensorReading {
        SensorReading {
            id: Uuid::new_v4(),
            plant_id: Uuid::new_v4(),
            temperature,
            humidity,
            light,
            soil_moisture,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn status_severity_order() {
        assert!(HealthStatus::Excellent < HealthStatus::Good);
        assert!(HealthStatus::Good < HealthStatus::Warning);
        assert!(HealthStatus::Warning < HealthStatus::Critical);
    }

    #[test]
    fn worse_never_improves() {
        assert_eq!(
            HealthStatus::Critical.worse(HealthStatus::Excellent),
            HealthStatus::Critical
        );
        assert_eq!(
            HealthStatus::Excellent.worse(HealthStatus::Good),
            HealthStatus::Good
        );
        assert_eq!(
            HealthStatus::Warning.worse(HealthStatus::Good),
            HealthStatus::Warning
        );
    }

    #[test]
    fn no_data_is_permissive() {
        let a = HealthAnalysis::no_data();
        assert_eq!(a.status, HealthStatus::Good);
        assert!(!a.needs_water);
        assert!(!a.needs_light);
        assert!(a.recommendations.is_empty());
    }

    #[test]
    fn ideal_reading_is_excellent_with_single_recommendation() {
        let a = evaluate_health(&reading(22.0, 55.0, 4000.0, 50.0), "Monstera deliciosa").unwrap();
        assert_eq!(a.status, HealthStatus::Excellent);
        assert!(!a.needs_water);
        assert!(!a.needs_light);
        assert_eq!(a.recommendations.len(), 1);
    }

    #[test]
    fn bone_dry_soil_is_critical_regardless_of_other_metrics() {
        let a = evaluate_health(&reading(22.0, 55.0, 4000.0, 15.0), "Ficus lyrata").unwrap();
        assert_eq!(a.status, HealthStatus::Critical);
        assert!(a.needs_water);
        assert!(a.recommendations[0].to_lowercase().contains("water immediately"));
    }

    #[test]
    fn multiple_warnings_collapse_to_warning_not_critical() {
        let a = evaluate_health(&reading(30.0, 35.0, 300.0, 50.0), "Epipremnum aureum").unwrap();
        assert_eq!(a.status, HealthStatus::Warning);
        assert!(a.needs_light);
        assert!(!a.needs_water);
        assert!(a.recommendations.len() >= 3);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let r = reading(19.0, 45.0, 2500.0, 30.0);
        let a = evaluate_health(&r, "Aloe vera").unwrap();
        let b = evaluate_health(&r, "Aloe vera").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn status_never_improves_as_moisture_drops() {
        let mut last = HealthStatus::Excellent;
        for moisture in [70.0, 50.0, 36.0, 34.0, 20.0, 19.9, 10.0, 0.0, -5.0] {
            let a = evaluate_health(&reading(22.0, 55.0, 4000.0, moisture), "x").unwrap();
            assert!(
                a.status >= last,
                "status improved from {last} to {} at moisture {moisture}",
                a.status
            );
            last = a.status;
        }
    }

    #[test]
    fn non_finite_field_is_rejected() {
        let err = evaluate_health(&reading(f64::NAN, 55.0, 4000.0, 50.0), "x").unwrap_err();
        assert_eq!(err, ReadingError::NonFinite("temperature"));
    }
}
