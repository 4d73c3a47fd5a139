//! Accumulates drawn households into per-zone worker-category tables and writes the two output
//! families, grouped by home zone, occupation, and employment class.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;

use synthutil::Timer;

use crate::files::create_file;
use crate::{SeedHousehold, SeedPerson};

/// The eight output tables per family: occupation (Professional, General office, Sales/retail,
/// Manufacturing) crossed with employment status (Full-time, Part-time), in file naming order.
const OCC_EMP: [(&str, usize, usize); 8] = [
    ("PF", 0, 0),
    ("GF", 1, 0),
    ("SF", 2, 0),
    ("MF", 3, 0),
    ("PP", 0, 1),
    ("GP", 1, 1),
    ("SP", 2, 1),
    ("MP", 3, 1),
];

/// Per zone, a flat vector over (occupation, employment, mobility class): index
/// `(o + 4e) * 3 + w`. Zones only materialize once something contributes to them.
pub struct WorkerCategories {
    zones: BTreeMap<i32, [f64; 24]>,
}

impl WorkerCategories {
    pub fn new() -> WorkerCategories {
        WorkerCategories {
            zones: BTreeMap::new(),
        }
    }

    /// Adds one drawn household living in `zone`. Every person with a recognized occupation and
    /// employment status contributes the household's expansion factor to one cell; work-from-home
    /// and unemployed persons don't count here.
    pub fn record(&mut self, zone: i32, household: &SeedHousehold, persons: &[SeedPerson]) {
        let licenses = persons.iter().filter(|p| p.has_license()).count();
        let w = mobility_class(licenses, household.num_vehicles);
        for person in persons {
            if let (Some(o), Some(e)) = (
                occupation_index(&person.occupation),
                employment_index(&person.employment_status),
            ) {
                let cells = self.zones.entry(zone).or_insert([0.0; 24]);
                cells[(o + 4 * e) * 3 + w] += household.expansion_factor;
            }
        }
    }

    /// Writes all 16 files: `ZonalResidence/<OE>.csv` with one total row per zone, and
    /// `WorkerCategories/<OE>.csv` with one ratio row per nonzero mobility class. The files don't
    /// depend on each other, so they're written in parallel.
    pub fn write_all(&self, output_dir: &str, timer: &mut Timer) -> Result<()> {
        let mut requests = Vec::new();
        for ratios in [false, true] {
            for (code, o, e) in OCC_EMP {
                requests.push((ratios, code, o, e));
            }
        }
        for result in timer.parallelize(
            "write worker category tables",
            requests,
            |(ratios, code, o, e)| self.write_table(output_dir, ratios, code, o, e),
        ) {
            result?;
        }
        Ok(())
    }

    fn write_table(
        &self,
        output_dir: &str,
        ratios: bool,
        code: &str,
        o: usize,
        e: usize,
    ) -> Result<()> {
        let family = if ratios {
            "WorkerCategories"
        } else {
            "ZonalResidence"
        };
        let mut out = create_file(&format!("{}/{}/{}.csv", output_dir, family, code))?;
        writeln!(out, "HomeZone,WorkerCategory,Data")?;

        let base = (o + 4 * e) * 3;
        for (zone, cells) in &self.zones {
            let slice = &cells[base..base + 3];
            let total: f64 = slice.iter().sum();
            if ratios {
                if total > 0.0 {
                    for (w, value) in slice.iter().enumerate() {
                        if *value > 0.0 {
                            writeln!(out, "{},{},{}", zone, w + 1, value / total)?;
                        }
                    }
                }
            } else {
                // The WorkerCategory column stays in the header for schema parity, but totals
                // don't belong to any one category.
                writeln!(out, "{},{}", zone, total)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

impl Default for WorkerCategories {
    fn default() -> WorkerCategories {
        WorkerCategories::new()
    }
}

/// 0 if the household has no vehicles or no drivers, 1 if there are fewer vehicles than drivers,
/// 2 otherwise.
fn mobility_class(licenses: usize, vehicles: i32) -> usize {
    if vehicles == 0 || licenses == 0 {
        0
    } else if (vehicles as usize) < licenses {
        1
    } else {
        2
    }
}

fn occupation_index(code: &str) -> Option<usize> {
    match code {
        "P" => Some(0),
        "G" => Some(1),
        "S" => Some(2),
        "M" => Some(3),
        _ => None,
    }
}

fn employment_index(code: &str) -> Option<usize> {
    match code {
        "F" => Some(0),
        "P" => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::tests::{household, person};

    #[test]
    fn mobility_classes() {
        assert_eq!(mobility_class(2, 0), 0);
        assert_eq!(mobility_class(0, 3), 0);
        assert_eq!(mobility_class(2, 1), 1);
        assert_eq!(mobility_class(2, 2), 2);
        assert_eq!(mobility_class(1, 3), 2);
    }

    #[test]
    fn single_contribution() {
        // Two licensed persons, no vehicles: mobility class 0. Only the full-time professional
        // counts; the second person is unemployed.
        let mut hh = household(1, 1, 7.0, 2);
        hh.num_vehicles = 0;
        let mut worker = person(7.0);
        worker.occupation = "P".to_string();
        worker.employment_status = "F".to_string();
        let mut retiree = person(7.0);
        retiree.occupation = "O".to_string();
        retiree.employment_status = "O".to_string();

        let mut categories = WorkerCategories::new();
        categories.record(52, &hh, &[worker, retiree]);
        assert_eq!(categories.zones[&52][0], 7.0);
        assert_eq!(categories.zones[&52][1..].iter().sum::<f64>(), 0.0);

        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().display().to_string();
        categories
            .write_all(&out, &mut Timer::throwaway())
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("ZonalResidence/PF.csv")).unwrap(),
            "HomeZone,WorkerCategory,Data\n52,7\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("WorkerCategories/PF.csv")).unwrap(),
            "HomeZone,WorkerCategory,Data\n52,1,1\n"
        );
        // The zone still gets a zero total row in the other residence tables, but no ratio rows.
        assert_eq!(
            std::fs::read_to_string(dir.path().join("ZonalResidence/GF.csv")).unwrap(),
            "HomeZone,WorkerCategory,Data\n52,0\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("WorkerCategories/GF.csv")).unwrap(),
            "HomeZone,WorkerCategory,Data\n"
        );
    }

    #[test]
    fn work_from_home_is_skipped() {
        let hh = household(1, 1, 3.0, 1);
        let mut homeworker = person(3.0);
        homeworker.employment_status = "H".to_string();
        let mut categories = WorkerCategories::new();
        categories.record(7, &hh, &[homeworker]);
        assert!(categories.zones.is_empty());
    }

    #[test]
    fn ratios_split_across_mobility_classes() {
        // One vehicle, two drivers: class 1. Another household, two vehicles: class 2.
        let mut short_of_cars = household(1, 1, 6.0, 2);
        short_of_cars.num_vehicles = 1;
        let mut well_supplied = household(2, 1, 2.0, 2);
        well_supplied.num_vehicles = 2;
        let crew = vec![person(1.0), person(1.0)];

        let mut categories = WorkerCategories::new();
        categories.record(9, &short_of_cars, &crew);
        categories.record(9, &well_supplied, &crew);

        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().display().to_string();
        categories
            .write_all(&out, &mut Timer::throwaway())
            .unwrap();

        // 12 from the first household, 4 from the second, 16 total.
        assert_eq!(
            std::fs::read_to_string(dir.path().join("ZonalResidence/PF.csv")).unwrap(),
            "HomeZone,WorkerCategory,Data\n9,16\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("WorkerCategories/PF.csv")).unwrap(),
            "HomeZone,WorkerCategory,Data\n9,2,0.75\n9,3,0.25\n"
        );
    }
}
