//! Derived indices recomputed from the population state.
//!
//! All maps are `BTreeMap`s so that anything iterating them (pricing,
//! summaries) does so in id order.

use std::collections::BTreeMap;

use lu_core::{RegionId, ZoneId};

use crate::{DataContainer, DataResult};

/// Regional and zonal aggregates used by the annual models.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Indicators {
    /// Share of dwellings that are vacant, per region.
    pub dwelling_vacancy_by_region: BTreeMap<RegionId, f64>,
    pub dwelling_vacancy:           f64,
    /// Share of jobs that are vacant, per region.
    pub job_vacancy_by_region:      BTreeMap<RegionId, f64>,
    pub job_vacancy:                f64,
    /// Mean monthly dwelling price, per region.
    pub avg_price_by_region:        BTreeMap<RegionId, f64>,
    /// Annual housing cost over annual household income, per region
    /// (occupied dwellings only).
    pub rent_share_by_region:       BTreeMap<RegionId, f64>,
    /// Jobs per km², per zone.
    pub job_density_by_zone:        BTreeMap<ZoneId, f64>,
}

fn share(part: u64, total: u64) -> f64 {
    if total == 0 { 0.0 } else { part as f64 / total as f64 }
}

impl Indicators {
    pub fn compute(data: &DataContainer) -> DataResult<Self> {
        let (dwelling_vacancy_by_region, dwelling_vacancy) = Self::dwelling_vacancy(data)?;
        let (job_vacancy_by_region, job_vacancy) = Self::job_vacancy(data)?;

        let mut price_sum: BTreeMap<RegionId, (f64, u64)> = BTreeMap::new();
        let mut cost_income: BTreeMap<RegionId, (f64, f64)> = BTreeMap::new();
        for d in data.dwellings.iter() {
            let region = data.geography.region_of(d.zone)?;
            let e = price_sum.entry(region).or_default();
            e.0 += d.price;
            e.1 += 1;
            if let Some(hh) = d.household {
                let income = data.household_income(hh)?;
                let e = cost_income.entry(region).or_default();
                e.0 += d.price * 12.0;
                e.1 += income;
            }
        }
        let avg_price_by_region = price_sum
            .into_iter()
            .map(|(r, (sum, n))| (r, sum / n as f64))
            .collect();
        let rent_share_by_region = cost_income
            .into_iter()
            .map(|(r, (cost, income))| (r, if income > 0.0 { cost / income } else { 0.0 }))
            .collect();

        let mut jobs_by_zone: BTreeMap<ZoneId, u64> = BTreeMap::new();
        for j in data.jobs.iter() {
            *jobs_by_zone.entry(j.location.zone()).or_default() += 1;
        }
        let job_density_by_zone = data
            .geography
            .zones
            .iter()
            .map(|z| {
                let jobs = jobs_by_zone.get(&z.id).copied().unwrap_or(0) as f64;
                let density = if z.area_km2 > 0.0 { jobs / z.area_km2 } else { 0.0 };
                (z.id, density)
            })
            .collect();

        Ok(Self {
            dwelling_vacancy_by_region,
            dwelling_vacancy,
            job_vacancy_by_region,
            job_vacancy,
            avg_price_by_region,
            rent_share_by_region,
            job_density_by_zone,
        })
    }

    pub(crate) fn dwelling_vacancy(data: &DataContainer) -> DataResult<(BTreeMap<RegionId, f64>, f64)> {
        let mut counts: BTreeMap<RegionId, (u64, u64)> = BTreeMap::new();
        for d in data.dwellings.iter() {
            let e = counts.entry(data.geography.region_of(d.zone)?).or_default();
            e.0 += d.is_vacant() as u64;
            e.1 += 1;
        }
        Ok(Self::rates(counts))
    }

    pub(crate) fn job_vacancy(data: &DataContainer) -> DataResult<(BTreeMap<RegionId, f64>, f64)> {
        let mut counts: BTreeMap<RegionId, (u64, u64)> = BTreeMap::new();
        for j in data.jobs.iter() {
            let e = counts.entry(data.geography.region_of(j.location.zone())?).or_default();
            e.0 += j.is_vacant() as u64;
            e.1 += 1;
        }
        Ok(Self::rates(counts))
    }

    fn rates(counts: BTreeMap<RegionId, (u64, u64)>) -> (BTreeMap<RegionId, f64>, f64) {
        let (vacant, total) = counts.values().fold((0, 0), |(v, t), (cv, ct)| (v + cv, t + ct));
        let by_region = counts.into_iter().map(|(r, (v, t))| (r, share(v, t))).collect();
        (by_region, share(vacant, total))
    }
}
