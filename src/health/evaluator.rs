//! Per-metric threshold evaluation.
//!
//! `evaluate` is a pure function from a validated reading to one verdict per
//! metric. It has no opinion about the overall status; ranking and
//! recommendation text live in [`crate::health::aggregator`].

use crate::db::models::SensorReading;

// Threshold constants. Percentages for moisture/humidity, lux for light,
// degrees Celsius for temperature.
pub const MOISTURE_CRITICAL_LOW: f64 = 20.0;
pub const MOISTURE_WARN_LOW: f64 = 35.0;
pub const MOISTURE_WARN_HIGH: f64 = 75.0;
pub const LIGHT_WARN_LOW: f64 = 500.0;
pub const LIGHT_WARN_HIGH: f64 = 10_000.0;
pub const TEMPERATURE_WARN_LOW: f64 = 15.0;
pub const TEMPERATURE_WARN_HIGH: f64 = 28.0;
pub const HUMIDITY_WARN_LOW: f64 = 40.0;

/// Verdict for a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricVerdict {
    CriticalLow,
    WarnLow,
    Ok,
    WarnHigh,
}

/// One verdict per metric, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingVerdicts {
    pub soil_moisture: MetricVerdict,
    pub light: MetricVerdict,
    pub temperature: MetricVerdict,
    pub humidity: MetricVerdict,
}

/// A reading that cannot be evaluated. Non-finite values come from upstream
/// data-integrity bugs, so this propagates instead of degrading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadingError {
    #[error("sensor reading field '{0}' is not a finite number")]
    NonFinite(&'static str),
}

/// Validate that every field of the reading is a finite number.
pub fn validate(reading: &SensorReading) -> Result<(), ReadingError> {
    let fields = [
        ("temperature", reading.temperature),
        ("humidity", reading.humidity),
        ("light", reading.light),
        ("soil_moisture", reading.soil_moisture),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(ReadingError::NonFinite(name));
        }
    }
    Ok(())
}

/// Evaluate a reading into per-metric verdicts.
///
/// Total over finite inputs: any finite value, however extreme, maps to a
/// verdict. Out-of-range values are taken literally, not clamped.
pub fn evaluate(reading: &SensorReading) -> Result<ReadingVerdicts, ReadingError> {
    validate(reading)?;

    let soil_moisture = if reading.soil_moisture < MOISTURE_CRITICAL_LOW {
        MetricVerdict::CriticalLow
    } else if reading.soil_moisture < MOISTURE_WARN_LOW {
        MetricVerdict::WarnLow
    } else if reading.soil_moisture > MOISTURE_WARN_HIGH {
        MetricVerdict::WarnHigh
    } else {
        MetricVerdict::Ok
    };

    let light = if reading.light < LIGHT_WARN_LOW {
        MetricVerdict::WarnLow
    } else if reading.light > LIGHT_WARN_HIGH {
        MetricVerdict::WarnHigh
    } else {
        MetricVerdict::Ok
    };

    let temperature = if reading.temperature < TEMPERATURE_WARN_LOW {
        MetricVerdict::WarnLow
    } else if reading.temperature > TEMPERATURE_WARN_HIGH {
        MetricVerdict::WarnHigh
    } else {
        MetricVerdict::Ok
    };

    let humidity = if reading.humidity < HUMIDITY_WARN_LOW {
        MetricVerdict::WarnLow
    } else {
        MetricVerdict::Ok
    };

    Ok(ReadingVerdicts {
        soil_moisture,
        light,
        temperature,
        humidity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::tests::reading;

    #[test]
    fn all_metrics_in_band_are_ok() {
        let v = evaluate(&reading(22.0, 55.0, 4000.0, 50.0)).unwrap();
        assert_eq!(v.soil_moisture, MetricVerdict::Ok);
        assert_eq!(v.light, MetricVerdict::Ok);
        assert_eq!(v.temperature, MetricVerdict::Ok);
        assert_eq!(v.humidity, MetricVerdict::Ok);
    }

    #[test]
    fn moisture_bands() {
        let at = |m: f64| evaluate(&reading(22.0, 55.0, 4000.0, m)).unwrap().soil_moisture;
        assert_eq!(at(19.99), MetricVerdict::CriticalLow);
        assert_eq!(at(20.0), MetricVerdict::WarnLow);
        assert_eq!(at(34.99), MetricVerdict::WarnLow);
        assert_eq!(at(35.0), MetricVerdict::Ok);
        assert_eq!(at(75.0), MetricVerdict::Ok);
        assert_eq!(at(75.01), MetricVerdict::WarnHigh);
    }

    #[test]
    fn light_bands() {
        let at = |l: f64| evaluate(&reading(22.0, 55.0, l, 50.0)).unwrap().light;
        assert_eq!(at(499.0), MetricVerdict::WarnLow);
        assert_eq!(at(500.0), MetricVerdict::Ok);
        assert_eq!(at(10_000.0), MetricVerdict::Ok);
        assert_eq!(at(10_001.0), MetricVerdict::WarnHigh);
    }

    #[test]
    fn temperature_bands() {
        let at = |t: f64| evaluate(&reading(t, 55.0, 4000.0, 50.0)).unwrap().temperature;
        assert_eq!(at(14.9), MetricVerdict::WarnLow);
        assert_eq!(at(15.0), MetricVerdict::Ok);
        assert_eq!(at(28.0), MetricVerdict::Ok);
        assert_eq!(at(28.1), MetricVerdict::WarnHigh);
    }

    #[test]
    fn humidity_only_warns_low() {
        let at = |h: f64| evaluate(&reading(22.0, h, 4000.0, 50.0)).unwrap().humidity;
        assert_eq!(at(39.9), MetricVerdict::WarnLow);
        assert_eq!(at(40.0), MetricVerdict::Ok);
        assert_eq!(at(100.0), MetricVerdict::Ok);
    }

    #[test]
    fn extreme_finite_values_still_evaluate() {
        let v = evaluate(&reading(-40.0, 150.0, 1e9, -10.0)).unwrap();
        assert_eq!(v.soil_moisture, MetricVerdict::CriticalLow);
        assert_eq!(v.light, MetricVerdict::WarnHigh);
        assert_eq!(v.temperature, MetricVerdict::WarnLow);
        assert_eq!(v.humidity, MetricVerdict::Ok);
    }

    #[test]
    fn validate_rejects_each_non_finite_field() {
        assert_eq!(
            validate(&reading(f64::INFINITY, 55.0, 4000.0, 50.0)),
            Err(ReadingError::NonFinite("temperature"))
        );
        assert_eq!(
            validate(&reading(22.0, f64::NAN, 4000.0, 50.0)),
            Err(ReadingError::NonFinite("humidity"))
        );
        assert_eq!(
            validate(&reading(22.0, 55.0, f64::NEG_INFINITY, 50.0)),
            Err(ReadingError::NonFinite("light"))
        );
        assert_eq!(
            validate(&reading(22.0, 55.0, 4000.0, f64::NAN)),
            Err(ReadingError::NonFinite("soil_moisture"))
        );
    }
}
