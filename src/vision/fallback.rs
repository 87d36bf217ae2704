//! Deterministic-shape mock identification used whenever the remote
//! classifier is unconfigured or fails.
//!
//! Output is random per call but structurally bounded: the species always
//! comes from [`SPECIES_TABLE`] and the confidence from a fixed band, so the
//! gateway's "always returns a valid result" contract holds with no network.

use std::time::Duration;

use rand::Rng;

use super::models::IdentificationResult;

/// One row of the reference species table.
#[derive(Debug, Clone, Copy)]
pub struct SpeciesEntry {
    pub common_name: &'static str,
    pub scientific_name: &'static str,
    pub description: &'static str,
}

/// Common houseplants used for mock identification.
pub const SPECIES_TABLE: [SpeciesEntry; 10] = [
    SpeciesEntry {
        common_name: "Monstera Deliciosa",
        scientific_name: "Monstera deliciosa",
        description: "A popular tropical plant with large, distinctive split leaves",
    },
    SpeciesEntry {
        common_name: "Snake Plant",
        scientific_name: "Sansevieria trifasciata",
        description: "Hardy succulent with upright sword-like leaves",
    },
    SpeciesEntry {
        common_name: "Fiddle Leaf Fig",
        scientific_name: "Ficus lyrata",
        description: "Tree with large, violin-shaped leaves",
    },
    SpeciesEntry {
        common_name: "Peace Lily",
        scientific_name: "Spathiphyllum wallisii",
        description: "Flowering plant with white blooms and dark green leaves",
    },
    SpeciesEntry {
        common_name: "Pothos",
        scientific_name: "Epipremnum aureum",
        description: "Trailing vine with heart-shaped leaves",
    },
    SpeciesEntry {
        common_name: "Spider Plant",
        scientific_name: "Chlorophytum comosum",
        description: "Easy-care plant with long, arching leaves",
    },
    SpeciesEntry {
        common_name: "Rubber Plant",
        scientific_name: "Ficus elastica",
        description: "Tree with large, glossy oval leaves",
    },
    SpeciesEntry {
        common_name: "ZZ Plant",
        scientific_name: "Zamioculcas zamiifolia",
        description: "Drought-tolerant with thick, waxy leaves",
    },
    SpeciesEntry {
        common_name: "Aloe Vera",
        scientific_name: "Aloe vera",
        description: "Succulent with medicinal gel-filled leaves",
    },
    SpeciesEntry {
        common_name: "Boston Fern",
        scientific_name: "Nephrolepis exaltata",
        description: "Lush fern with delicate, feathery fronds",
    },
];

/// Confidence band for mock results, one decimal place.
pub const CONFIDENCE_MIN: f64 = 75.0;
pub const CONFIDENCE_MAX: f64 = 98.0;

/// Emulated classification latency. Suspends the calling task only.
const SIMULATED_LATENCY: Duration = Duration::from_millis(1500);

/// Pick a species and confidence from the injected RNG.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> IdentificationResult {
    let entry = &SPECIES_TABLE[rng.gen_range(0..SPECIES_TABLE.len())];
    let confidence = (rng.gen_range(CONFIDENCE_MIN..=CONFIDENCE_MAX) * 10.0).round() / 10.0;

    IdentificationResult {
        common_name: entry.common_name.to_owned(),
        scientific_name: entry.scientific_name.to_owned(),
        confidence,
        description: entry.description.to_owned(),
    }
}

/// Async entry point used by the gateway: waits out the simulated latency,
/// then draws from the thread-local RNG.
pub async fn generate() -> IdentificationResult {
    tokio::time::sleep(SIMULATED_LATENCY).await;
    generate_with(&mut rand::thread_rng())
}
