//! The driver: loads inputs, samples every planning district in parallel, relabels the draws with
//! fresh household ids, and writes all of the output tables.

use std::collections::HashSet;
use std::io::Write;

use anyhow::Result;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use synthutil::{fork_rng, prettyprint_usize, Timer};

use crate::files::{
    create_file, path_seed_households, path_seed_persons, path_synthesized_households,
    path_synthesized_persons, path_zone_system,
};
use crate::{sample_district, Config, LandUseTable, SeedStore, WorkerCategories};

/// Runs the whole pipeline. Given the same configuration and inputs, the outputs are
/// byte-identical across runs and machine thread counts.
pub fn synthesize(config: &Config) -> Result<()> {
    let mut timer = Timer::new("synthesize population");
    let (land_use, seed) = load_inputs(config, &mut timer)?;

    // Fork one generator per district up front, serially and in ascending district order. Which
    // thread ends up sampling which district then can't matter.
    let mut master_rng = XorShiftRng::seed_from_u64(config.random_seed);
    let districts: Vec<(i32, XorShiftRng)> = land_use
        .planning_districts()
        .into_iter()
        .map(|pd| {
            let district_rng = fork_rng(&mut master_rng);
            (pd, district_rng)
        })
        .collect();

    let results = timer.parallelize("sample districts", districts, |(pd, rng)| {
        sample_district(&land_use, &seed, pd, rng)
    });

    timer.start("write household data");
    let mut households_out = create_households_writer(&config.output_directory)?;
    let mut persons_out = create_persons_writer(&config.output_directory)?;

    let mut categories = WorkerCategories::new();
    let mut next_id: i32 = 1;
    let mut total_persons: usize = 0;
    let mut warned_no_persons: HashSet<i32> = HashSet::new();

    // Districts come back in ascending order; a single counter over that stream labels every
    // household.
    for result in results {
        for (seed_id, zone) in result? {
            let household = seed.household(seed_id);
            writeln!(
                households_out,
                "{},{},1,{},{},{},{}",
                next_id,
                zone,
                household.dwelling_type,
                household.num_persons,
                household.num_vehicles,
                household.income
            )?;

            let persons = seed.persons(seed_id);
            if persons.is_empty() {
                if warned_no_persons.insert(seed_id) {
                    warn!("seed household {} has no person records", seed_id);
                }
            } else {
                // Rescale so the household's persons average out to one concrete person apiece.
                let mean_expansion = persons.iter().map(|p| p.expansion_factor).sum::<f64>()
                    / (persons.len() as f64);
                for (idx, person) in persons.iter().enumerate() {
                    writeln!(
                        persons_out,
                        "{},{},{},{},{},{},{},{},{},{},{},{},{}",
                        next_id,
                        idx + 1,
                        person.age,
                        person.sex,
                        person.license,
                        person.transit_pass,
                        person.employment_status,
                        person.occupation,
                        if person.free_parking { "Y" } else { "N" },
                        person.student_status,
                        person.employment_pd,
                        person.school_pd,
                        person.expansion_factor / mean_expansion
                    )?;
                }
                total_persons += persons.len();
            }

            categories.record(zone, household, persons);
            next_id += 1;
        }
    }
    households_out.flush()?;
    persons_out.flush()?;
    timer.stop("write household data");

    categories.write_all(&config.output_directory, &mut timer)?;

    timer.note(format!(
        "synthesized {} households ({} persons) from a pool of {} seed households",
        prettyprint_usize((next_id - 1) as usize),
        prettyprint_usize(total_persons),
        prettyprint_usize(seed.num_households())
    ));
    Ok(())
}

/// Rebuilds just the worker-category tables from a previously synthesized `HouseholdData/`
/// directory, keeping the aggregate outputs in sync after hand edits. The files load through the
/// seed schema, so the aggregator keys each household by its `HouseholdPD` column; in a freshly
/// synthesized file that column position carries the drawn zone.
pub fn regenerate_worker_categories(config: &Config) -> Result<()> {
    let mut timer = Timer::new("regenerate worker categories");

    timer.start("load synthesized households");
    let store = SeedStore::load(
        &path_synthesized_households(&config.output_directory),
        &path_synthesized_persons(&config.output_directory),
    )?;
    timer.stop("load synthesized households");

    let mut categories = WorkerCategories::new();
    timer.start_iter("aggregate households", store.num_households());
    for household in store.households() {
        timer.next();
        categories.record(household.pd, household, store.persons(household.id));
    }

    categories.write_all(&config.output_directory, &mut timer)?;
    Ok(())
}

fn load_inputs(config: &Config, timer: &mut Timer) -> Result<(LandUseTable, SeedStore)> {
    timer.start("load land use");
    let land_use = LandUseTable::load(
        &path_zone_system(&config.input_directory),
        &config.population_forecast_file,
    )?;
    timer.stop("load land use");

    timer.start("load seed records");
    let seed = SeedStore::load(
        &path_seed_households(&config.input_directory),
        &path_seed_persons(&config.input_directory),
    )?;
    timer.stop("load seed records");

    info!(
        "{} zones across {} planning districts, {} seed households",
        land_use.num_zones(),
        land_use.planning_districts().len(),
        seed.num_households()
    );
    Ok((land_use, seed))
}

fn create_households_writer(
    output_dir: &str,
) -> Result<std::io::BufWriter<fs_err::File>> {
    let mut out = create_file(&path_synthesized_households(output_dir))?;
    writeln!(
        out,
        "HouseholdID,Zone,ExpansionFactor,DwellingType,NumberOfPersons,NumberOfVehicles,Income"
    )?;
    Ok(out)
}

fn create_persons_writer(output_dir: &str) -> Result<std::io::BufWriter<fs_err::File>> {
    let mut out = create_file(&path_synthesized_persons(output_dir))?;
    // The historical schema names these columns EmploymentZone and SchoolZone, even though the
    // data carries planning districts; downstream consumers expect the old names.
    writeln!(
        out,
        "HouseholdID,PersonNumber,Age,Sex,License,TransitPass,EmploymentStatus,Occupation,\
         FreeParking,StudentStatus,EmploymentZone,SchoolZone,ExpansionFactor"
    )?;
    Ok(out)
}
