//! popsynth draws a forecast population of households and persons for a travel demand model.
//!
//! The inputs are a seed sample from a travel survey (households and the persons living in them,
//! each scaled to census totals by an expansion factor) and a forecast of how many residents each
//! traffic analysis zone must contain. The pieces form a pipeline:
//!
//! 1) Load the zone system and forecast into a `LandUseTable`, and the survey records into a
//!    `SeedStore`.
//! 2) For each planning district, draw seed households without replacement (weighted by residual
//!    expansion factor) until every zone in the district meets its population target.
//! 3) Relabel the draws with fresh sequential household ids and write the final
//!    `HouseholdData/Households.csv` and `HouseholdData/Persons.csv`.
//! 4) Accumulate every drawn household into per-zone worker-category tables and write those out,
//!    grouped by home zone, occupation, and employment class.
//!
//! Sampling different districts is independent and runs in parallel, but all randomness flows
//! through a two-level RNG derivation (run seed, then one generator per district, then one per
//! zone), so the outputs are byte-identical across runs and thread counts.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

pub use crate::land_use::LandUseTable;
pub use crate::sampler::sample_district;
pub use crate::seed::{SeedHousehold, SeedPerson, SeedStore};
pub use crate::synthesize::{regenerate_worker_categories, synthesize};
pub use crate::workers::WorkerCategories;

mod files;
mod land_use;
mod sampler;
mod seed;
mod synthesize;
mod workers;

/// Everything needed for one synthesis run. All paths are plain strings, resolved relative to the
/// process's working directory.
pub struct Config {
    /// CSV with `Zone, Population` rows; population may be fractional.
    pub population_forecast_file: String,
    /// Directory holding `ZoneSystem.csv`, `SeedHouseholds.csv`, and `SeedPersons.csv`.
    pub input_directory: String,
    /// Directory where `HouseholdData/`, `ZonalResidence/`, and `WorkerCategories/` are written.
    pub output_directory: String,
    /// Seed for the run's master RNG. The same seed and inputs always reproduce the same outputs.
    pub random_seed: u64,
}
