//! Weighted-without-replacement draws for one planning district. Each zone keeps drawing seed
//! households (weighted by residual expansion factor) until it meets its forecast population.

use anyhow::Result;
use rand::Rng;
use rand_xorshift::XorShiftRng;

use synthutil::fork_rng;

use crate::{LandUseTable, SeedHousehold, SeedStore};

/// How many times a single draw may reset the residual weights before giving up.
const NUMBER_OF_ATTEMPTS: usize = 3;
/// Residual weights that fall below this after a draw are treated as fully spent.
const WEIGHT_FLOOR: f64 = 0.01;

/// Draws `(seed household id, zone)` pairs until every zone in the district meets its rounded
/// population target. The result is in draw order: one pass over the district's zones at a time,
/// zones in zone system order, skipping zones already satisfied.
///
/// Only households whose survey home district is `pd` are eligible, and all randomness comes from
/// generators forked off `rng`, one per zone.
pub fn sample_district(
    land_use: &LandUseTable,
    seed: &SeedStore,
    pd: i32,
    mut rng: XorShiftRng,
) -> Result<Vec<(i32, i32)>> {
    // households() is ascending by id, so the pool is too.
    let pool: Vec<&SeedHousehold> = seed.households().filter(|hh| hh.pd == pd).collect();
    let mut weights: Vec<f64> = pool.iter().map(|hh| hh.expansion_factor).collect();
    let mut total: f64 = weights.iter().sum();

    let zones = land_use.zones_in_pd(pd)?;
    let mut remaining: Vec<i64> = Vec::with_capacity(zones.len());
    for zone in zones {
        remaining.push(land_use.population(*zone)?.round() as i64);
    }

    // Every zone gets its own generator up front, so a zone's outcomes don't depend on how the
    // district's other zones interleave with it.
    let mut zone_rngs: Vec<XorShiftRng> = zones.iter().map(|_| fork_rng(&mut rng)).collect();

    let mut draws = Vec::new();
    let mut any = true;
    while any {
        any = false;
        for i in 0..zones.len() {
            if remaining[i] <= 0 {
                continue;
            }
            let k = draw_once(&pool, &mut weights, &mut total, remaining[i], &mut zone_rngs[i])
                .ok_or_else(|| sampling_failure(pd, zones[i], remaining[i], &pool, total))?;
            remaining[i] -= i64::from(pool[k].num_persons);
            draws.push((pool[k].id, zones[i]));
            any = true;
        }
    }
    Ok(draws)
}

/// One weighted draw: pick the first household at or past a uniform target in the cumulative
/// residual-weight walk that still has weight and fits in the zone's remaining persons. Decrements
/// the winner's weight by 1, clamping anything below the floor to 0. Refills the whole weight
/// vector between failed attempts; None means every attempt failed.
fn draw_once(
    pool: &[&SeedHousehold],
    weights: &mut [f64],
    total: &mut f64,
    remaining: i64,
    rng: &mut XorShiftRng,
) -> Option<usize> {
    for attempt in 0..NUMBER_OF_ATTEMPTS {
        if attempt > 0 {
            for (w, hh) in weights.iter_mut().zip(pool.iter()) {
                *w = hh.expansion_factor;
            }
            *total = weights.iter().sum();
        }

        let target = rng.gen::<f64>() * *total;
        let mut acc = 0.0;
        for (k, hh) in pool.iter().enumerate() {
            acc += weights[k];
            // >= rather than >, so a run of spent entries sitting exactly at the target can't
            // stall the walk.
            if acc >= target && weights[k] > 0.0 && i64::from(hh.num_persons) <= remaining {
                let prev = weights[k];
                weights[k] -= 1.0;
                if weights[k] < WEIGHT_FLOOR {
                    weights[k] = 0.0;
                }
                *total -= prev - weights[k];
                return Some(k);
            }
        }
    }
    None
}

/// Figure out the most specific reason a zone couldn't be filled.
fn sampling_failure(
    pd: i32,
    zone: i32,
    remaining: i64,
    pool: &[&SeedHousehold],
    total: f64,
) -> anyhow::Error {
    if pool.is_empty() {
        return anyhow!("planning district {} has no seed households to draw from", pd);
    }
    if !pool.iter().any(|hh| i64::from(hh.num_persons) <= remaining) {
        return anyhow!(
            "zone {} still needs {} more residents, but every seed household in planning \
             district {} has more persons than that",
            zone,
            remaining,
            pd
        );
    }
    if total <= 0.0 {
        return anyhow!(
            "the expansion factor weights for planning district {} are exhausted, but zone {} \
             still needs {} more residents",
            pd,
            zone,
            remaining
        );
    }
    anyhow!(
        "failed to draw a household for zone {} after {} attempts",
        zone,
        NUMBER_OF_ATTEMPTS
    )
}
