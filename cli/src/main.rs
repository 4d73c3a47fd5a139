// Example invocations:
// synthesize --forecast data/forecast_2031.csv --input data/survey --output data/synthesized
// regenerate-worker-categories --forecast data/forecast_2031.csv --input data/survey --output
//     data/synthesized

use structopt::StructOpt;

use popsynth::Config;

#[derive(StructOpt)]
#[structopt(
    name = "popsynth",
    about = "Synthesizes a forecast population of households for a travel demand model"
)]
enum Command {
    /// Draw a fresh synthetic population and write every output table
    Synthesize {
        #[structopt(flatten)]
        flags: Flags,
    },
    /// Rebuild the worker-category tables from already-synthesized household files
    RegenerateWorkerCategories {
        #[structopt(flatten)]
        flags: Flags,
    },
}

#[derive(StructOpt)]
struct Flags {
    /// CSV of Zone,Population targets; population may be fractional
    #[structopt(long)]
    forecast: String,
    /// Directory holding ZoneSystem.csv, SeedHouseholds.csv, and SeedPersons.csv
    #[structopt(long)]
    input: String,
    /// Directory where all outputs are written
    #[structopt(long)]
    output: String,
    /// A seed for generating random numbers
    #[structopt(long, default_value = "42")]
    rng_seed: u64,
}

impl Flags {
    fn into_config(self) -> Config {
        Config {
            population_forecast_file: self.forecast,
            input_directory: self.input,
            output_directory: self.output,
            random_seed: self.rng_seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    synthutil::Logger::setup();

    match Command::from_args() {
        Command::Synthesize { flags } => popsynth::synthesize(&flags.into_config()),
        Command::RegenerateWorkerCategories { flags } => {
            popsynth::regenerate_worker_categories(&flags.into_config())
        }
    }
}
