//! Income and vehicle-fleet updates.

use tracing::debug;

use lu_core::HouseholdId;

use crate::{AnnualModel, CarOwnershipModel, ModelContext, ModelResult};

// ── Income ────────────────────────────────────────────────────────────────────

/// Employed persons' incomes grow by `growth` per year.
#[derive(Debug)]
pub struct IncomeAdjustment {
    pub growth: f64,
}

impl Default for IncomeAdjustment {
    fn default() -> Self {
        Self { growth: 0.015 }
    }
}

impl AnnualModel for IncomeAdjustment {
    fn name(&self) -> &str {
        "income"
    }

    fn run(&mut self, ctx: &mut ModelContext<'_>) -> ModelResult<()> {
        let factor = 1.0 + self.growth;
        for p in ctx.data.persons.iter_mut().filter(|p| p.is_employed()) {
            p.income *= factor;
        }
        Ok(())
    }
}

// ── Car ownership ─────────────────────────────────────────────────────────────

/// Cars follow licences and income: every licensed adult gets a car, capped
/// at one below `one_car_below` and at two below `two_cars_below`.
#[derive(Debug)]
pub struct RuleCarOwnership {
    pub one_car_below:  f64,
    pub two_cars_below: f64,
}

impl Default for RuleCarOwnership {
    fn default() -> Self {
        Self { one_car_below: 20_000.0, two_cars_below: 60_000.0 }
    }
}

impl RuleCarOwnership {
    pub fn target(&self, licences: u32, income: f64) -> u32 {
        let cap = if income < self.one_car_below {
            1
        } else if income < self.two_cars_below {
            2
        } else {
            u32::MAX
        };
        licences.min(cap)
    }
}

impl CarOwnershipModel for RuleCarOwnership {
    fn name(&self) -> &str {
        "car_ownership"
    }

    fn update(&mut self, households: &[HouseholdId], ctx: &mut ModelContext<'_>) -> ModelResult<u64> {
        let mut changed = 0;
        for &id in households {
            // Dissolved later in the year.
            let Some(hh) = ctx.data.households.try_get(id) else { continue };
            let mut licences = 0;
            for m in &hh.members {
                licences += ctx.data.persons.get(*m)?.license as u32;
            }
            let target = self.target(licences, ctx.data.household_income(id)?);

            let hh = ctx.data.households.get_mut(id)?;
            if hh.autos != target {
                hh.autos = target;
                hh.autonomous = hh.autonomous.min(target);
                changed += 1;
            }
        }
        debug!(year = %ctx.year, considered = households.len(), changed, "car ownership updated");
        Ok(changed)
    }
}

// ── Autonomous vehicles ───────────────────────────────────────────────────────

/// High-income households with a conventional car switch one of them to an
/// autonomous vehicle with probability `switch_rate`.
#[derive(Debug)]
pub struct AvSwitching {
    pub switch_rate: f64,
    pub min_income:  f64,
}

impl Default for AvSwitching {
    fn default() -> Self {
        Self { switch_rate: 0.05, min_income: 80_000.0 }
    }
}

impl CarOwnershipModel for AvSwitching {
    fn name(&self) -> &str {
        "av_switching"
    }

    fn update(&mut self, households: &[HouseholdId], ctx: &mut ModelContext<'_>) -> ModelResult<u64> {
        let mut switched = 0;
        for &id in households {
            let Some(hh) = ctx.data.households.try_get(id) else { continue };
            if hh.autos <= hh.autonomous {
                continue;
            }
            if ctx.data.household_income(id)? < self.min_income {
                continue;
            }
            if ctx.rng.gen_bool(self.switch_rate) {
                ctx.data.households.get_mut(id)?.autonomous += 1;
                switched += 1;
            }
        }
        Ok(switched)
    }
}
