//! Hansen-type zonal accessibility.

use std::collections::BTreeMap;

use tracing::info;

use lu_core::{Mode, RegionId, Year};
use lu_data::DataContainer;
use lu_travel::{SkimMatrix, TravelTimes};

use crate::{AnnualModel, ModelContext, ModelResult};

/// Accessibility of zone *i*:
///
/// ```text
/// A_i = Σ_j  P_j^alpha · exp(beta · t_ij)
/// ```
///
/// where `P_j` is the number of residents of zone *j* and `t_ij` the peak
/// skim time in minutes.  Scores are rescaled so the best zone has 100.
/// A region's score is the population-weighted mean of its zones' car
/// scores (plain mean when the region is empty).
///
/// As an annual step it computes accessibility for the following year; at
/// setup it computes it for the start year.
#[derive(Debug)]
pub struct HansenAccessibility {
    pub alpha:        f64,
    pub beta_car:     f64,
    pub beta_transit: f64,
}

impl Default for HansenAccessibility {
    fn default() -> Self {
        Self { alpha: 1.2, beta_car: -0.25, beta_transit: -0.3 }
    }
}

impl HansenAccessibility {
    /// Recompute every zone and region score and stamp them with `year`.
    pub fn calculate(&self, year: Year, data: &mut DataContainer, travel: &dyn TravelTimes) -> ModelResult<()> {
        let zones = travel.zone_system();
        let mut population = vec![0.0f64; zones.len()];
        for hh in data.households.iter() {
            let Some(d) = hh.dwelling else { continue };
            let zone = data.dwellings.get(d)?.zone;
            population[zones.index_of(zone)?] += hh.size() as f64;
        }

        let car = self.scores(&population, &*travel.peak_skim(Mode::Car)?, self.beta_car);
        let transit = self.scores(&population, &*travel.peak_skim(Mode::Transit)?, self.beta_transit);

        let mut by_region: BTreeMap<RegionId, (f64, f64, f64, u32)> = BTreeMap::new();
        for (i, &zone_id) in zones.zones().iter().enumerate() {
            let zone = data.geography.zones.get_mut(zone_id)?;
            zone.car_accessibility = car[i];
            zone.transit_accessibility = transit[i];
            let e = by_region.entry(zone.region).or_default();
            e.0 += car[i] * population[i];
            e.1 += population[i];
            e.2 += car[i];
            e.3 += 1;
        }
        for (region, (weighted, pop, plain, n)) in by_region {
            let score = if pop > 0.0 { weighted / pop } else { plain / n as f64 };
            data.geography.regions.get_mut(region)?.accessibility = score;
        }
        data.geography.accessibility_year = Some(year);

        let best = car.iter().copied().fold(0.0, f64::max);
        info!(%year, zones = zones.len(), best_car = best, "accessibility calculated");
        Ok(())
    }

    fn scores(&self, population: &[f64], skim: &SkimMatrix, beta: f64) -> Vec<f64> {
        let n = population.len();
        let raw: Vec<f64> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        let t = skim.get(i, j) as f64;
                        if population[j] <= 0.0 || !t.is_finite() {
                            0.0
                        } else {
                            population[j].powf(self.alpha) * (beta * t).exp()
                        }
                    })
                    .sum()
            })
            .collect();
        let max = raw.iter().copied().fold(0.0, f64::max);
        if max > 0.0 {
            raw.into_iter().map(|a| a / max * 100.0).collect()
        } else {
            raw
        }
    }
}

impl AnnualModel for HansenAccessibility {
    fn name(&self) -> &str {
        "accessibility"
    }

    fn setup(&mut self, ctx: &mut ModelContext<'_>) -> ModelResult<()> {
        self.calculate(ctx.year, ctx.data, ctx.travel)
    }

    fn run(&mut self, ctx: &mut ModelContext<'_>) -> ModelResult<()> {
        self.calculate(ctx.year.next(), ctx.data, ctx.travel)
    }
}
