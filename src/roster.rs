// 📋 Roster - one loaded snapshot of companies, devs and freebies
//
// This is what an ORM session would hold in memory. It never writes: mutate
// entities, commit through `db`, then `Roster::load` again to see the result.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashSet;

use crate::db;
use crate::entities::{Company, Dev, Freebie};

#[derive(Debug, Clone, Default, Serialize)]
pub struct Roster {
    pub companies: Vec<Company>,
    pub devs: Vec<Dev>,
    pub freebies: Vec<Freebie>,
}

impl Roster {
    /// Fetch all three tables
    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(Roster {
            companies: db::get_all_companies(conn).context("Failed to load companies")?,
            devs: db::get_all_devs(conn).context("Failed to load devs")?,
            freebies: db::get_all_freebies(conn).context("Failed to load freebies")?,
        })
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    pub fn company(&self, id: i64) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == Some(id))
    }

    pub fn dev(&self, id: i64) -> Option<&Dev> {
        self.devs.iter().find(|d| d.id == Some(id))
    }

    pub fn freebie(&self, id: i64) -> Option<&Freebie> {
        self.freebies.iter().find(|f| f.id == Some(id))
    }

    pub fn company_named(&self, name: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.name == name)
    }

    pub fn dev_named(&self, name: &str) -> Option<&Dev> {
        self.devs.iter().find(|d| d.name == name)
    }

    pub fn freebie_named(&self, item_name: &str) -> Option<&Freebie> {
        self.freebies.iter().find(|f| f.item_name == item_name)
    }

    /// Resolve freebie.dev_id
    pub fn owner_of(&self, freebie: &Freebie) -> Option<&Dev> {
        freebie.dev_id.and_then(|id| self.dev(id))
    }

    /// Resolve freebie.company_id
    pub fn issuer_of(&self, freebie: &Freebie) -> Option<&Company> {
        freebie.company_id.and_then(|id| self.company(id))
    }

    // ========================================================================
    // RELATIONSHIPS
    // ========================================================================

    /// Dev.freebies
    pub fn freebies_of_dev(&self, dev: &Dev) -> Vec<&Freebie> {
        self.freebies.iter().filter(|f| dev.owns(f)).collect()
    }

    /// Company.freebies
    pub fn freebies_of_company(&self, company: &Company) -> Vec<&Freebie> {
        match company.id {
            Some(id) => self
                .freebies
                .iter()
                .filter(|f| f.company_id == Some(id))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Distinct companies this dev holds freebies from, in first-seen order
    pub fn companies_of_dev(&self, dev: &Dev) -> Vec<&Company> {
        let mut seen = HashSet::new();
        self.freebies_of_dev(dev)
            .into_iter()
            .filter_map(|f| self.issuer_of(f))
            .filter(|c| seen.insert(c.id))
            .collect()
    }

    /// Distinct devs holding freebies from this company, in first-seen order
    pub fn devs_of_company(&self, company: &Company) -> Vec<&Dev> {
        let mut seen = HashSet::new();
        self.freebies_of_company(company)
            .into_iter()
            .filter_map(|f| self.owner_of(f))
            .filter(|d| seen.insert(d.id))
            .collect()
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Freebie::describe with references resolved from this snapshot
    pub fn describe(&self, freebie: &Freebie) -> String {
        freebie.describe(self.owner_of(freebie), self.issuer_of(freebie))
    }

    pub fn oldest_company(&self) -> Option<&Company> {
        Company::oldest_company(&self.companies)
    }

    pub fn received_one(&self, dev: &Dev, item_name: &str) -> bool {
        dev.received_one(&self.freebies, item_name)
    }

    /// Item names a dev owns, in id order
    pub fn item_names_of_dev(&self, dev: &Dev) -> Vec<String> {
        self.freebies_of_dev(dev)
            .into_iter()
            .map(|f| f.item_name.clone())
            .collect()
    }
}
