//! The zone system and the forecast: which planning district each traffic analysis zone belongs
//! to, and how many residents each zone must contain.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ZoneRecord {
    #[serde(rename = "Zone")]
    zone: i32,
    #[serde(rename = "PD")]
    pd: i32,
}

#[derive(Debug, Deserialize)]
struct ForecastRecord {
    #[serde(rename = "Zone")]
    zone: i32,
    #[serde(rename = "Population")]
    population: f64,
}

pub struct LandUseTable {
    // Zone -> planning district, for membership checks
    districts: HashMap<i32, i32>,
    // Planning district -> zones, in the zone system's file order
    zones_per_pd: BTreeMap<i32, Vec<i32>>,
    // Only zones with a forecast row; everything else is implicitly 0
    forecast: HashMap<i32, f64>,
}

impl LandUseTable {
    pub fn load(zone_system_path: &str, forecast_path: &str) -> Result<LandUseTable> {
        let mut zones = Vec::new();
        for rec in csv::Reader::from_reader(fs_err::File::open(zone_system_path)?).deserialize() {
            let rec: ZoneRecord = rec.map_err(|err| anyhow!("{}: {}", zone_system_path, err))?;
            zones.push((rec.zone, rec.pd));
        }

        let mut forecast = Vec::new();
        for rec in csv::Reader::from_reader(fs_err::File::open(forecast_path)?).deserialize() {
            let rec: ForecastRecord = rec.map_err(|err| anyhow!("{}: {}", forecast_path, err))?;
            forecast.push((rec.zone, rec.population));
        }

        LandUseTable::build(zones, forecast)
    }

    /// `zones` is `(zone, planning district)` rows, `forecast` is `(zone, population)` rows, both
    /// in file order. Fails if the forecast mentions a zone missing from the zone system.
    pub fn build(zones: Vec<(i32, i32)>, forecast: Vec<(i32, f64)>) -> Result<LandUseTable> {
        let mut table = LandUseTable {
            districts: HashMap::new(),
            zones_per_pd: BTreeMap::new(),
            forecast: HashMap::new(),
        };
        for (zone, pd) in zones {
            table.districts.insert(zone, pd);
            table.zones_per_pd.entry(pd).or_insert_with(Vec::new).push(zone);
        }
        for (zone, population) in forecast {
            if !table.districts.contains_key(&zone) {
                bail!(
                    "the forecast gives zone {} a population of {}, but that zone isn't in the \
                     zone system",
                    zone,
                    population
                );
            }
            table.forecast.insert(zone, population);
        }
        Ok(table)
    }

    /// Every planning district, ascending, each once.
    pub fn planning_districts(&self) -> Vec<i32> {
        self.zones_per_pd.keys().cloned().collect()
    }

    pub fn num_zones(&self) -> usize {
        self.districts.len()
    }

    /// The district's zones, in zone system file order.
    pub fn zones_in_pd(&self, pd: i32) -> Result<&Vec<i32>> {
        self.zones_per_pd
            .get(&pd)
            .ok_or_else(|| anyhow!("planning district {} isn't in the zone system", pd))
    }

    /// The forecast population of a zone, 0 if the forecast has no row for it.
    pub fn population(&self, zone: i32) -> Result<f64> {
        if !self.districts.contains_key(&zone) {
            bail!("zone {} isn't in the zone system", zone);
        }
        Ok(self.forecast.get(&zone).cloned().unwrap_or(0.0))
    }
}
