//! Path conventions for the fixed input and output file layout.

use std::io::BufWriter;

use anyhow::Result;

pub fn path_zone_system(input_dir: &str) -> String {
    format!("{}/ZoneSystem.csv", input_dir)
}

pub fn path_seed_households(input_dir: &str) -> String {
    format!("{}/SeedHouseholds.csv", input_dir)
}

pub fn path_seed_persons(input_dir: &str) -> String {
    format!("{}/SeedPersons.csv", input_dir)
}

pub fn path_synthesized_households(output_dir: &str) -> String {
    format!("{}/HouseholdData/Households.csv", output_dir)
}

pub fn path_synthesized_persons(output_dir: &str) -> String {
    format!("{}/HouseholdData/Persons.csv", output_dir)
}

/// Opens a file for writing, creating parent directories first.
pub fn create_file(path: &str) -> Result<BufWriter<fs_err::File>> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        fs_err::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(fs_err::File::create(path)?))
}
