//! Real-estate price update.

use tracing::info;

use crate::{AnnualModel, ModelContext, ModelResult};

/// Prices move against the gap between regional vacancy and a structural
/// vacancy rate.
///
/// With regional vacancy `v` and structural rate `s`, every dwelling in the
/// region changes price by
///
/// ```text
/// v < s :  +sensitivity · (s - v) / s         (at most +max_increase)
/// v ≥ s :  -sensitivity · (v - s) / (1 - s)   (at most -max_decrease)
/// ```
///
/// Vacancy is recomputed from the current occupancy before prices move;
/// the indicators are refreshed afterwards.
#[derive(Debug)]
pub struct VacancyPricing {
    pub structural_vacancy: f64,
    pub sensitivity:        f64,
    pub max_increase:       f64,
    pub max_decrease:       f64,
}

impl Default for VacancyPricing {
    fn default() -> Self {
        Self { structural_vacancy: 0.05, sensitivity: 0.1, max_increase: 0.1, max_decrease: 0.1 }
    }
}

impl VacancyPricing {
    /// Relative price change for a region with vacancy `v`.
    pub fn change(&self, v: f64) -> f64 {
        let s = self.structural_vacancy;
        if v < s {
            (self.sensitivity * (s - v) / s).min(self.max_increase)
        } else {
            -(self.sensitivity * (v - s) / (1.0 - s)).min(self.max_decrease)
        }
    }
}

impl AnnualModel for VacancyPricing {
    fn name(&self) -> &str {
        "pricing"
    }

    fn run(&mut self, ctx: &mut ModelContext<'_>) -> ModelResult<()> {
        ctx.data.compute_indicators()?;
        let data = &mut *ctx.data;
        let vacancy = &data.indicators.dwelling_vacancy_by_region;

        let mut changed = 0u64;
        for d in data.dwellings.iter_mut() {
            let region = data.geography.region_of(d.zone)?;
            let delta = self.change(vacancy.get(&region).copied().unwrap_or(0.0));
            if delta != 0.0 {
                d.price *= 1.0 + delta;
                changed += 1;
            }
        }
        ctx.data.compute_indicators()?;
        info!(year = %ctx.year, changed, "dwelling prices updated");
        Ok(())
    }
}
