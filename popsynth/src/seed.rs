//! The seed sample: survey households and the persons living in them, used as the draw pool.

use std::collections::BTreeMap;

use anyhow::Result;
use synthutil::MultiMap;

/// One surveyed household. The expansion factor scales it to census totals and doubles as its
/// sampling weight.
#[derive(Clone, Debug)]
pub struct SeedHousehold {
    pub id: i32,
    pub pd: i32,
    pub expansion_factor: f64,
    pub dwelling_type: i32,
    pub num_persons: i32,
    pub num_vehicles: i32,
    pub income: i32,
}

/// One surveyed person, keyed by the household they live in. `employment_pd` is 0 for somebody
/// not employed and 8888 for a worker with no fixed workplace; `school_pd` is 0 for somebody not
/// a student.
#[derive(Clone, Debug)]
pub struct SeedPerson {
    pub age: i32,
    pub sex: String,
    pub license: String,
    pub transit_pass: String,
    pub employment_status: String,
    pub occupation: String,
    pub free_parking: bool,
    pub student_status: String,
    pub employment_pd: i32,
    pub school_pd: i32,
    pub expansion_factor: f64,
}

impl SeedPerson {
    pub fn has_license(&self) -> bool {
        self.license == "Y"
    }
}

pub struct SeedStore {
    households: BTreeMap<i32, SeedHousehold>,
    persons: MultiMap<i32, SeedPerson>,
}

impl SeedStore {
    pub fn load(households_path: &str, persons_path: &str) -> Result<SeedStore> {
        let households = load_households(households_path)?;
        let persons = load_persons(persons_path)?;
        Ok(SeedStore::build(households, persons))
    }

    pub fn build(households: Vec<SeedHousehold>, persons: Vec<(i32, SeedPerson)>) -> SeedStore {
        let mut store = SeedStore {
            households: BTreeMap::new(),
            persons: MultiMap::new(),
        };
        for hh in households {
            store.households.insert(hh.id, hh);
        }
        // Person rows whose household id never shows up in the household table just sit in an
        // orphan group; nothing ever asks for them.
        for (id, person) in persons {
            store.persons.insert(id, person);
        }
        store
    }

    /// All seed households, ascending by id.
    pub fn households(&self) -> impl Iterator<Item = &SeedHousehold> {
        self.households.values()
    }

    pub fn num_households(&self) -> usize {
        self.households.len()
    }

    pub fn household(&self, id: i32) -> &SeedHousehold {
        &self.households[&id]
    }

    /// The household's persons, in survey file order. Empty if the household has no person rows.
    pub fn persons(&self, household: i32) -> &Vec<SeedPerson> {
        self.persons.get(household)
    }
}

fn load_households(path: &str) -> Result<Vec<SeedHousehold>> {
    let mut households = Vec::new();
    for rec in csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(fs_err::File::open(path)?)
        .records()
    {
        let rec = rec?;
        // Rows with the wrong shape are dropped, not fatal; the survey exports carry the
        // occasional truncated line.
        if rec.len() != 7 {
            continue;
        }
        households.push(SeedHousehold {
            id: parse_field(&rec, 0, "HouseholdID")?,
            pd: parse_field(&rec, 1, "HouseholdPD")?,
            expansion_factor: parse_field(&rec, 2, "ExpansionFactor")?,
            dwelling_type: parse_field(&rec, 3, "DwellingType")?,
            num_persons: parse_field(&rec, 4, "NumberOfPersons")?,
            num_vehicles: parse_field(&rec, 5, "NumberOfVehicles")?,
            income: parse_field(&rec, 6, "Income")?,
        });
    }
    Ok(households)
}

fn load_persons(path: &str) -> Result<Vec<(i32, SeedPerson)>> {
    let mut persons = Vec::new();
    for rec in csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(fs_err::File::open(path)?)
        .records()
    {
        let rec = rec?;
        if rec.len() < 13 {
            continue;
        }
        let household: i32 = parse_field(&rec, 0, "HouseholdID")?;
        // Column 1 is the survey's person number; it gets reassigned on output, so don't bother
        // keeping it.
        persons.push((
            household,
            SeedPerson {
                age: parse_field(&rec, 2, "Age")?,
                sex: field(&rec, 3),
                license: field(&rec, 4),
                transit_pass: field(&rec, 5),
                employment_status: field(&rec, 6),
                occupation: field(&rec, 7),
                free_parking: field(&rec, 8) == "Y",
                student_status: field(&rec, 9),
                employment_pd: parse_field(&rec, 10, "EmploymentPD")?,
                school_pd: parse_field(&rec, 11, "SchoolPD")?,
                expansion_factor: parse_field(&rec, 12, "ExpansionFactor")?,
            },
        ));
    }
    Ok(persons)
}

fn field(rec: &csv::StringRecord, idx: usize) -> String {
    rec.get(idx).unwrap_or("").trim().to_string()
}

fn parse_field<T: std::str::FromStr>(rec: &csv::StringRecord, idx: usize, col: &str) -> Result<T> {
    let raw = rec.get(idx).unwrap_or("").trim();
    raw.parse::<T>()
        .map_err(|_| anyhow!("couldn't parse {} = {:?} in row {:?}", col, raw, rec))
}
