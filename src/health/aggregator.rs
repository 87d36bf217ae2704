//! Combines per-metric verdicts into an overall [`HealthAnalysis`].
//!
//! Status is computed as a fold of `HealthStatus::worse` over an ordered rule
//! list, so severity can only escalate. Recommendation order is fixed:
//! moisture, light, temperature, humidity, closing remark.

use crate::db::models::SensorReading;

use super::{
    evaluator::{MetricVerdict, ReadingVerdicts},
    HealthAnalysis, HealthStatus,
};

// Temperature/humidity sub-range the narrative calls "ideal". Narrower than
// the warning bands on purpose: the narrative restates, it never reclassifies.
const IDEAL_TEMP_MIN: f64 = 18.0;
const IDEAL_TEMP_MAX: f64 = 26.0;
const IDEAL_HUMIDITY_MIN: f64 = 40.0;

pub fn aggregate(
    reading: &SensorReading,
    verdicts: &ReadingVerdicts,
    species_label: &str,
) -> HealthAnalysis {
    let mut status = HealthStatus::Excellent;
    let mut needs_water = false;
    let mut needs_light = false;
    let mut recommendations = Vec::new();

    // Soil moisture. Critical-low is the only rule that can reach Critical,
    // independent of every other metric.
    match verdicts.soil_moisture {
        MetricVerdict::CriticalLow => {
            status = status.worse(HealthStatus::Critical);
            needs_water = true;
            recommendations.push("Critical: water immediately! Soil is very dry.".to_owned());
        }
        MetricVerdict::WarnLow => {
            status = status.worse(HealthStatus::Warning);
            needs_water = true;
            recommendations
                .push("Water your plant soon. Soil moisture is getting low.".to_owned());
        }
        MetricVerdict::WarnHigh => {
            status = status.worse(HealthStatus::Warning);
            recommendations
                .push("Soil is too wet. Reduce watering to prevent root rot.".to_owned());
        }
        MetricVerdict::Ok => {}
    }

    // Light.
    match verdicts.light {
        MetricVerdict::WarnLow => {
            status = status.worse(HealthStatus::Warning);
            needs_light = true;
            recommendations
                .push("Move to a brighter location. Light levels are too low.".to_owned());
        }
        MetricVerdict::WarnHigh => {
            status = status.worse(HealthStatus::Warning);
            recommendations.push("Too much direct sunlight. Consider partial shade.".to_owned());
        }
        _ => {}
    }

    // Temperature.
    match verdicts.temperature {
        MetricVerdict::WarnLow => {
            status = status.worse(HealthStatus::Warning);
            recommendations.push("Temperature is too cold. Move to a warmer spot.".to_owned());
        }
        MetricVerdict::WarnHigh => {
            status = status.worse(HealthStatus::Warning);
            recommendations.push("Temperature is too warm. Provide cooling or shade.".to_owned());
        }
        _ => {}
    }

    // Humidity alone never escalates past Good.
    if verdicts.humidity == MetricVerdict::WarnLow {
        status = status.worse(HealthStatus::Good);
        recommendations
            .push("Consider misting or using a humidifier for better growth.".to_owned());
    }

    if status == HealthStatus::Excellent {
        recommendations.push("Perfect conditions! Your plant is thriving.".to_owned());
    }

    let narrative = narrative(reading, species_label, status, needs_water, needs_light);

    HealthAnalysis {
        status,
        needs_water,
        needs_light,
        recommendations,
        narrative,
    }
}

fn narrative(
    reading: &SensorReading,
    species_label: &str,
    status: HealthStatus,
    needs_water: bool,
    needs_light: bool,
) -> String {
    let water = if needs_water {
        "The soil moisture level indicates your plant needs watering."
    } else {
        "Soil moisture is adequate."
    };
    let light = if needs_light {
        "Light exposure should be increased for optimal photosynthesis."
    } else {
        "Light levels are appropriate."
    };
    let climate = if (IDEAL_TEMP_MIN..=IDEAL_TEMP_MAX).contains(&reading.temperature)
        && reading.humidity >= IDEAL_HUMIDITY_MIN
    {
        "within ideal range"
    } else {
        "outside optimal range"
    };

    format!(
        "Based on current sensor data for your {species_label}, environmental conditions are \
         {status}. {water} {light} Temperature ({}°C) and humidity ({}%) are {climate}. \
         Continue monitoring daily for best results.",
        reading.temperature, reading.humidity
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{evaluator::evaluate, tests::reading};

    fn analyse(temperature: f64, humidity: f64, light: f64, soil_moisture: f64) -> HealthAnalysis {
        let r = reading(temperature, humidity, light, soil_moisture);
        let v = evaluate(&r).unwrap();
        aggregate(&r, &v, "Monstera deliciosa")
    }

    #[test]
    fn ideal_reading_gets_single_affirming_recommendation() {
        let a = analyse(22.0, 55.0, 4000.0, 50.0);
        assert_eq!(a.status, HealthStatus::Excellent);
        assert_eq!(
            a.recommendations,
            vec!["Perfect conditions! Your plant is thriving.".to_owned()]
        );
    }

    #[test]
    fn critical_moisture_overrides_everything_else() {
        // Every other metric also bad; status must still be Critical, not more.
        let a = analyse(35.0, 20.0, 100.0, 5.0);
        assert_eq!(a.status, HealthStatus::Critical);
        assert!(a.needs_water);
        assert!(a.recommendations[0].contains("water immediately"));
    }

    #[test]
    fn warn_low_moisture_sets_needs_water_without_critical() {
        let a = analyse(22.0, 55.0, 4000.0, 30.0);
        assert_eq!(a.status, HealthStatus::Warning);
        assert!(a.needs_water);
    }

    #[test]
    fn soggy_soil_warns_without_needs_water() {
        let a = analyse(22.0, 55.0, 4000.0, 80.0);
        assert_eq!(a.status, HealthStatus::Warning);
        assert!(!a.needs_water);
        assert!(a.recommendations[0].contains("too wet"));
    }

    #[test]
    fn humidity_alone_only_demotes_to_good() {
        let a = analyse(22.0, 30.0, 4000.0, 50.0);
        assert_eq!(a.status, HealthStatus::Good);
        assert!(!a.needs_water);
        assert!(!a.needs_light);
        assert_eq!(a.recommendations.len(), 1);
        assert!(a.recommendations[0].contains("humidifier"));
    }

    #[test]
    fn humidity_does_not_demote_a_warning() {
        let a = analyse(30.0, 30.0, 4000.0, 50.0);
        assert_eq!(a.status, HealthStatus::Warning);
    }

    #[test]
    fn humidity_does_not_demote_a_critical() {
        let a = analyse(22.0, 30.0, 4000.0, 10.0);
        assert_eq!(a.status, HealthStatus::Critical);
    }

    #[test]
    fn recommendations_keep_evaluation_order() {
        let a = analyse(30.0, 35.0, 300.0, 30.0);
        assert_eq!(a.status, HealthStatus::Warning);
        let recs = &a.recommendations;
        assert_eq!(recs.len(), 4);
        assert!(recs[0].contains("Water your plant soon"));
        assert!(recs[1].contains("brighter location"));
        assert!(recs[2].contains("too warm"));
        assert!(recs[3].contains("humidifier"));
    }

    #[test]
    fn narrative_restates_flags_and_values() {
        let a = analyse(22.0, 55.0, 4000.0, 15.0);
        assert!(a.narrative.contains("Monstera deliciosa"));
        assert!(a.narrative.contains("critical"));
        assert!(a.narrative.contains("needs watering"));
        assert!(a.narrative.contains("22°C"));
        assert!(a.narrative.contains("55%"));
        assert!(a.narrative.contains("within ideal range"));
    }

    #[test]
    fn narrative_joint_ideal_range_requires_both_metrics() {
        assert!(analyse(22.0, 55.0, 4000.0, 50.0).narrative.contains("within ideal range"));
        assert!(analyse(17.0, 55.0, 4000.0, 50.0).narrative.contains("outside optimal range"));
        assert!(analyse(22.0, 35.0, 4000.0, 50.0).narrative.contains("outside optimal range"));
        assert!(analyse(27.0, 55.0, 4000.0, 50.0).narrative.contains("outside optimal range"));
    }
}
