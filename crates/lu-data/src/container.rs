//! `DataContainer` — the shared, mutable population state.
//!
//! # Referential invariants
//!
//! 1. A dwelling's occupant, if any, is a live household whose `dwelling`
//!    points back at it; at most one household occupies a dwelling.
//! 2. A job's worker, if any, is a live person whose `job` points back at it.
//! 3. Every member of a household is a live person whose `household` points
//!    back; every person is a member of exactly that household.
//! 4. A school's `occupancy` equals the number of persons enrolled there and
//!    never exceeds `capacity`.
//!
//! The relationship-changing methods below (`move_household`, `assign_job`,
//! `enrol`, `remove_person`, `dissolve_household`, …) update both sides
//! together, so event handlers cannot leave half an edge behind.
//! [`DataContainer::check_invariants`] verifies all four rules.

use lu_core::{DwellingId, HouseholdId, JobId, PersonId, SchoolId};

use crate::{
    DataError, DataResult, Dwelling, DwellingUsage, Geography, Household, Indicators, Job,
    Person, Registry, School,
};

/// All population registries plus geography and derived indicators.
#[derive(Debug, Default)]
pub struct DataContainer {
    pub households: Registry<Household>,
    pub persons:    Registry<Person>,
    pub dwellings:  Registry<Dwelling>,
    pub jobs:       Registry<Job>,
    pub schools:    Registry<School>,
    pub geography:  Geography,
    pub indicators: Indicators,
}

impl DataContainer {
    pub fn new(geography: Geography) -> Self {
        Self { geography, ..Self::default() }
    }

    // ── Creation ──────────────────────────────────────────────────────────

    /// Add a vacant dwelling in a known zone.
    pub fn add_dwelling(&mut self, mut dwelling: Dwelling) -> DataResult<()> {
        self.geography.require_zone(dwelling.zone)?;
        if dwelling.household.is_some() {
            return Err(DataError::Inconsistent(format!(
                "{} added with an occupant; use move_household",
                dwelling.id
            )));
        }
        if dwelling.usage == DwellingUsage::Default {
            dwelling.usage = DwellingUsage::Vacant;
        }
        self.dwellings.add(dwelling)
    }

    /// Add a vacant job in a known zone.
    pub fn add_job(&mut self, job: Job) -> DataResult<()> {
        self.geography.require_zone(job.location.zone())?;
        if job.worker.is_some() {
            return Err(DataError::Inconsistent(format!(
                "{} added with a worker; use assign_job",
                job.id
            )));
        }
        self.jobs.add(job)
    }

    pub fn add_school(&mut self, mut school: School) -> DataResult<()> {
        self.geography.require_zone(school.location.zone())?;
        school.occupancy = 0;
        self.schools.add(school)
    }

    /// Add an empty household that does not yet occupy a dwelling.
    pub fn add_household(&mut self, household: Household) -> DataResult<()> {
        if !household.members.is_empty() || household.dwelling.is_some() {
            return Err(DataError::Inconsistent(format!(
                "{} must be added empty; use add_person and move_household",
                household.id
            )));
        }
        self.households.add(household)
    }

    /// Add a person and append them to their household's members.  Any job or
    /// school attachment on `person` is ignored; use `assign_job` / `enrol`.
    pub fn add_person(&mut self, mut person: Person) -> DataResult<()> {
        let household = person.household;
        self.households.get(household)?;
        person.job = None;
        person.school = None;
        let id = person.id;
        self.persons.add(person)?;
        self.households.get_mut(household)?.members.push(id);
        Ok(())
    }

    // ── Dwellings ─────────────────────────────────────────────────────────

    /// Move `household` into the vacant dwelling `to`, vacating its current
    /// dwelling.  Marks the household updated.
    pub fn move_household(&mut self, household: HouseholdId, to: DwellingId) -> DataResult<()> {
        let target = self.dwellings.get(to)?;
        if let Some(occupant) = target.household {
            if occupant == household {
                return Ok(());
            }
            return Err(DataError::DwellingOccupied { dwelling: to, occupant });
        }
        self.vacate_dwelling(household)?;

        let dwelling = self.dwellings.get_mut(to)?;
        dwelling.household = Some(household);
        if dwelling.usage == DwellingUsage::Vacant {
            dwelling.usage = DwellingUsage::Default;
        }
        self.households.get_mut(household)?.dwelling = Some(to);
        self.households.mark_updated(household)
    }

    /// Detach `household` from its dwelling, if it has one.
    pub fn vacate_dwelling(&mut self, household: HouseholdId) -> DataResult<Option<DwellingId>> {
        let Some(current) = self.households.get_mut(household)?.dwelling.take() else {
            return Ok(None);
        };
        let dwelling = self.dwellings.get_mut(current)?;
        if dwelling.household != Some(household) {
            return Err(DataError::Inconsistent(format!(
                "{household} claims {current} but the dwelling is held by {:?}",
                dwelling.household
            )));
        }
        dwelling.household = None;
        dwelling.usage = DwellingUsage::Vacant;
        Ok(Some(current))
    }

    /// Vacant dwellings in insertion order.
    pub fn vacant_dwellings(&self) -> Vec<DwellingId> {
        self.dwellings.iter().filter(|d| d.is_vacant()).map(|d| d.id).collect()
    }

    /// Remove a dwelling; fails if it is occupied.
    pub fn remove_dwelling(&mut self, id: DwellingId) -> DataResult<Dwelling> {
        if let Some(occupant) = self.dwellings.get(id)?.household {
            return Err(DataError::DwellingOccupied { dwelling: id, occupant });
        }
        self.dwellings.remove(id)
    }

    // ── Jobs ──────────────────────────────────────────────────────────────

    /// Give `person` the vacant job `job`, releasing any job they held.
    /// Marks the person's household updated.
    pub fn assign_job(&mut self, person: PersonId, job: JobId) -> DataResult<()> {
        let target = self.jobs.get(job)?;
        if let Some(worker) = target.worker {
            if worker == person {
                return Ok(());
            }
            return Err(DataError::JobOccupied { job, worker });
        }
        self.release_job(person)?;

        self.jobs.get_mut(job)?.worker = Some(person);
        let p = self.persons.get_mut(person)?;
        p.job = Some(job);
        let household = p.household;
        self.households.mark_updated(household)
    }

    /// Detach `person` from their job, if any.  Marks the household updated
    /// when a job was released.
    pub fn release_job(&mut self, person: PersonId) -> DataResult<Option<JobId>> {
        let p = self.persons.get_mut(person)?;
        let Some(job) = p.job.take() else {
            return Ok(None);
        };
        let household = p.household;
        let j = self.jobs.get_mut(job)?;
        if j.worker != Some(person) {
            return Err(DataError::Inconsistent(format!(
                "{person} claims {job} but the job is held by {:?}",
                j.worker
            )));
        }
        j.worker = None;
        self.households.mark_updated(household)?;
        Ok(Some(job))
    }

    /// Vacant jobs in insertion order.
    pub fn vacant_jobs(&self) -> Vec<JobId> {
        self.jobs.iter().filter(|j| j.is_vacant()).map(|j| j.id).collect()
    }

    // ── Schools ───────────────────────────────────────────────────────────

    /// Enrol `person` at `school`, withdrawing from any current school.
    pub fn enrol(&mut self, person: PersonId, school: SchoolId) -> DataResult<()> {
        if self.persons.get(person)?.school == Some(school) {
            return Ok(());
        }
        if !self.schools.get(school)?.has_seat() {
            return Err(DataError::SchoolFull(school));
        }
        self.withdraw(person)?;
        self.schools.get_mut(school)?.occupancy += 1;
        self.persons.get_mut(person)?.school = Some(school);
        Ok(())
    }

    pub fn withdraw(&mut self, person: PersonId) -> DataResult<Option<SchoolId>> {
        let Some(school) = self.persons.get_mut(person)?.school.take() else {
            return Ok(None);
        };
        let s = self.schools.get_mut(school)?;
        s.occupancy = s.occupancy.checked_sub(1).ok_or_else(|| {
            DataError::Inconsistent(format!("{school} occupancy underflow withdrawing {person}"))
        })?;
        Ok(Some(school))
    }

    // ── Removal ───────────────────────────────────────────────────────────

    /// Remove a person, releasing their job and school seat and dropping them
    /// from their household.  The household itself is kept, even if empty.
    pub fn remove_person(&mut self, person: PersonId) -> DataResult<Person> {
        self.release_job(person)?;
        self.withdraw(person)?;
        let household = self.persons.get(person)?.household;
        let hh = self.households.get_mut(household)?;
        hh.members.retain(|m| *m != person);
        self.households.mark_updated(household)?;
        self.persons.remove(person)
    }

    /// Remove a household with all its members and vacate its dwelling.
    pub fn dissolve_household(&mut self, household: HouseholdId) -> DataResult<Household> {
        let members = self.households.get(household)?.members.clone();
        for person in members {
            self.remove_person(person)?;
        }
        self.vacate_dwelling(household)?;
        self.households.remove(household)
    }

    // ── Aggregates ────────────────────────────────────────────────────────

    /// Household income: the sum of member incomes.
    pub fn household_income(&self, household: HouseholdId) -> DataResult<f64> {
        let hh = self.households.get(household)?;
        hh.members
            .iter()
            .map(|p| self.persons.get(*p).map(|p| p.income))
            .sum()
    }

    /// Recompute every derived indicator.
    pub fn compute_indicators(&mut self) -> DataResult<()> {
        self.indicators = Indicators::compute(self)?;
        Ok(())
    }

    /// Recompute only the job vacancy rates.
    pub fn update_job_vacancy(&mut self) -> DataResult<()> {
        let (by_region, overall) = Indicators::job_vacancy(self)?;
        self.indicators.job_vacancy_by_region = by_region;
        self.indicators.job_vacancy = overall;
        Ok(())
    }

    // ── Verification ──────────────────────────────────────────────────────

    /// Check the four referential invariants listed in the module docs.
    pub fn check_invariants(&self) -> DataResult<()> {
        for d in self.dwellings.iter() {
            if let Some(hh) = d.household {
                let owner = self.households.get(hh)?;
                if owner.dwelling != Some(d.id) {
                    return Err(DataError::Inconsistent(format!(
                        "{} occupied by {hh}, which lives in {:?}",
                        d.id, owner.dwelling
                    )));
                }
            }
        }
        for hh in self.households.iter() {
            if let Some(d) = hh.dwelling {
                if self.dwellings.get(d)?.household != Some(hh.id) {
                    return Err(DataError::Inconsistent(format!(
                        "{} claims {d}, which is not occupied by it",
                        hh.id
                    )));
                }
            }
            for m in &hh.members {
                if self.persons.get(*m)?.household != hh.id {
                    return Err(DataError::Inconsistent(format!(
                        "{m} listed in {} but belongs elsewhere",
                        hh.id
                    )));
                }
            }
        }
        for j in self.jobs.iter() {
            if let Some(w) = j.worker {
                if self.persons.get(w)?.job != Some(j.id) {
                    return Err(DataError::Inconsistent(format!(
                        "{} filled by {w}, who does not hold it",
                        j.id
                    )));
                }
            }
        }
        let mut enrolled: rustc_hash::FxHashMap<SchoolId, u32> = Default::default();
        for p in self.persons.iter() {
            if !self.households.get(p.household)?.members.contains(&p.id) {
                return Err(DataError::Inconsistent(format!(
                    "{} missing from member list of {}",
                    p.id, p.household
                )));
            }
            if let Some(j) = p.job {
                if self.jobs.get(j)?.worker != Some(p.id) {
                    return Err(DataError::Inconsistent(format!(
                        "{} holds {j}, which names another worker",
                        p.id
                    )));
                }
            }
            if let Some(s) = p.school {
                *enrolled.entry(s).or_default() += 1;
            }
        }
        for s in self.schools.iter() {
            let count = enrolled.get(&s.id).copied().unwrap_or(0);
            if s.occupancy != count || s.occupancy > s.capacity {
                return Err(DataError::Inconsistent(format!(
                    "{} occupancy {} (enrolled {count}, capacity {})",
                    s.id, s.occupancy, s.capacity
                )));
            }
        }
        Ok(())
    }
}
