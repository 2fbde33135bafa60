//! Rescaling to household control totals.

use std::collections::BTreeMap;

use tracing::info;

use lu_core::{HouseholdId, IssueKind, Year};
use lu_data::{Household, Person};

use crate::{ModelContext, ModelResult, PopulationScaler, ScalingReport};

/// Brings the household count to an exogenous total for the year.
///
/// Surplus households are dissolved at random.  Missing households are
/// cloned (members' demographics and income, not their jobs or schools)
/// from random existing households into random vacant dwellings.
#[derive(Debug, Default)]
pub struct ControlTotalScaler {
    targets: BTreeMap<Year, usize>,
}

impl ControlTotalScaler {
    pub fn new(targets: impl IntoIterator<Item = (Year, usize)>) -> Self {
        Self { targets: targets.into_iter().collect() }
    }

    fn clone_household(template: HouseholdId, ctx: &mut ModelContext<'_>) -> ModelResult<HouseholdId> {
        let members: Vec<Person> = ctx
            .data
            .households
            .get(template)?
            .members
            .iter()
            .map(|m| ctx.data.persons.get(*m).cloned())
            .collect::<Result<_, _>>()?;

        let id = ctx.data.households.next_id();
        let mut hh = Household::new(id);
        hh.autos = ctx.data.households.get(template)?.autos;
        ctx.data.add_household(hh)?;
        for src in members {
            let mut p = Person::new(ctx.data.persons.next_id(), id, src.age, src.sex, src.role);
            p.income = src.income;
            p.license = src.license;
            ctx.data.add_person(p)?;
        }
        Ok(id)
    }
}

impl PopulationScaler for ControlTotalScaler {
    fn scale(&mut self, ctx: &mut ModelContext<'_>) -> ModelResult<ScalingReport> {
        let Some(&target) = self.targets.get(&ctx.year) else {
            ctx.issues.increment(IssueKind::MissingRecord, format!("no control total for {}", ctx.year));
            return Ok(ScalingReport::default());
        };
        let current = ctx.data.households.len();
        let mut report = ScalingReport::default();

        if current > target {
            let mut ids = ctx.data.households.ids();
            ctx.rng.shuffle(&mut ids);
            for id in ids.into_iter().take(current - target) {
                ctx.data.dissolve_household(id)?;
                report.removed += 1;
            }
        } else if current < target {
            let templates = ctx.data.households.ids();
            for _ in current..target {
                let Some(&template) = ctx.rng.choose(&templates) else {
                    ctx.issues.increment(IssueKind::ZeroProbability, "no household to clone");
                    break;
                };
                let vacant = ctx.data.vacant_dwellings();
                let Some(&dwelling) = ctx.rng.choose(&vacant) else {
                    ctx.issues.increment(IssueKind::NoVacantDwelling, "scaling up");
                    break;
                };
                let id = Self::clone_household(template, ctx)?;
                ctx.data.move_household(id, dwelling)?;
                report.added += 1;
            }
        }

        info!(year = %ctx.year, target, added = report.added, removed = report.removed, "population scaled");
        Ok(report)
    }
}
