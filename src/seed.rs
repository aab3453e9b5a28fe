// 🌱 Seed data + debug session
//
// Two fixture sets: the basic one (two companies, two devs, three freebies)
// and the debug one, which adds Microsoft, Emma and a Mousepad so the oldest
// company and give-away checks have something to work with.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

use crate::db::{self, with_transaction};
use crate::entities::{Company, Dev, GiveAway};
use crate::roster::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSet {
    Basic,
    Debug,
}

impl SeedSet {
    fn companies(&self) -> &'static [(&'static str, i64)] {
        match self {
            SeedSet::Basic => &[("Google", 1998), ("Amazon", 1994)],
            SeedSet::Debug => &[("Google", 1998), ("Amazon", 1994), ("Microsoft", 1975)],
        }
    }

    fn devs(&self) -> &'static [&'static str] {
        match self {
            SeedSet::Basic => &["Happiness", "Samuel"],
            SeedSet::Debug => &["Happiness", "Samuel", "Emma"],
        }
    }

    /// (item_name, value, dev, company)
    fn freebies(&self) -> &'static [(&'static str, i64, &'static str, &'static str)] {
        match self {
            SeedSet::Basic => &[
                ("T-shirt", 10, "Happiness", "Google"),
                ("Sticker Pack", 5, "Samuel", "Amazon"),
                ("Diary", 15, "Happiness", "Amazon"),
            ],
            SeedSet::Debug => &[
                ("T-shirt", 10, "Happiness", "Google"),
                ("Sticker Pack", 5, "Samuel", "Amazon"),
                ("Diary", 15, "Happiness", "Amazon"),
                ("Mousepad", 20, "Samuel", "Microsoft"),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub companies: usize,
    pub devs: usize,
    pub freebies: usize,
}

/// Wipe all tables and insert a known fixture set in one transaction
pub fn seed_database(conn: &mut Connection, set: SeedSet) -> Result<SeedSummary> {
    let summary = with_transaction(conn, |tx| {
        db::delete_all(tx)?;

        // Companies and devs first so the freebies have ids to point at
        let mut companies = Vec::new();
        for &(name, year) in set.companies() {
            let mut company = Company::new(name, year);
            db::insert_company(tx, &mut company)?;
            companies.push(company);
        }

        let mut devs = Vec::new();
        for &name in set.devs() {
            let mut dev = Dev::new(name);
            db::insert_dev(tx, &mut dev)?;
            devs.push(dev);
        }

        let mut freebies = 0;
        for &(item_name, value, dev_name, company_name) in set.freebies() {
            let dev = devs
                .iter()
                .find(|d| d.name == dev_name)
                .with_context(|| format!("Seed freebie {} names unknown dev {}", item_name, dev_name))?;
            let company = companies
                .iter()
                .find(|c| c.name == company_name)
                .with_context(|| {
                    format!("Seed freebie {} names unknown company {}", item_name, company_name)
                })?;

            let mut freebie = company.issue_freebie(dev, item_name, value);
            db::insert_freebie(tx, &mut freebie)?;
            freebies += 1;
        }

        Ok(SeedSummary {
            companies: companies.len(),
            devs: devs.len(),
            freebies,
        })
    })?;

    info!(
        companies = summary.companies,
        devs = summary.devs,
        freebies = summary.freebies,
        "seed data inserted"
    );

    Ok(summary)
}

// ============================================================================
// DEBUG SESSION
// ============================================================================

/// Everything the debug session observed, step by step
#[derive(Debug, Clone)]
pub struct DebugReport {
    // Relationship attributes
    pub tshirt_owner: String,
    pub tshirt_issuer: String,
    pub happiness_freebies: Vec<String>,
    pub happiness_companies: Vec<String>,
    pub google_freebies: Vec<String>,
    pub google_devs: Vec<String>,

    // Freebie details
    pub tshirt_details: String,

    // Issuing
    pub samuel_freebies_before: Vec<String>,
    pub samuel_freebies_after: Vec<String>,
    pub new_freebie_details: String,

    // Aggregates
    pub oldest_company: Option<Company>,
    pub received_tshirt: bool,
    pub received_laptop: bool,

    // Giving away
    pub happiness_before_give_away: Vec<String>,
    pub emma_before_give_away: Vec<String>,
    pub owned_give_away: GiveAway,
    pub happiness_after_give_away: Vec<String>,
    pub emma_after_give_away: Vec<String>,
    pub tshirt_owner_after: String,
    pub foreign_give_away: GiveAway,
    pub sticker_owner_after: String,
    pub happiness_final: Vec<String>,
    pub emma_final: Vec<String>,
}

fn dev_from(roster: &Roster, name: &str) -> Result<Dev> {
    roster
        .dev_named(name)
        .cloned()
        .with_context(|| format!("Dev {} missing from seed data", name))
}

fn owner_name(roster: &Roster, item_name: &str) -> Result<String> {
    let freebie = roster
        .freebie_named(item_name)
        .with_context(|| format!("Freebie {} missing from seed data", item_name))?;
    Ok(roster
        .owner_of(freebie)
        .map(|d| d.name.clone())
        .unwrap_or_default())
}

/// Seed the debug fixture, then exercise every operation, committing and
/// reloading between steps so each observation comes from storage.
pub fn run_debug_session(conn: &mut Connection) -> Result<DebugReport> {
    seed_database(conn, SeedSet::Debug)?;
    let roster = Roster::load(conn)?;

    let happiness = dev_from(&roster, "Happiness")?;
    let samuel = dev_from(&roster, "Samuel")?;
    let emma = dev_from(&roster, "Emma")?;
    let google = roster
        .company_named("Google")
        .cloned()
        .context("Company Google missing from seed data")?;

    // --- Relationship attributes ---
    let tshirt = roster
        .freebie_named("T-shirt")
        .cloned()
        .context("Freebie T-shirt missing from seed data")?;
    let sticker = roster
        .freebie_named("Sticker Pack")
        .cloned()
        .context("Freebie Sticker Pack missing from seed data")?;

    let tshirt_owner = owner_name(&roster, "T-shirt")?;
    let tshirt_issuer = roster
        .issuer_of(&tshirt)
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let happiness_freebies = roster.item_names_of_dev(&happiness);
    let happiness_companies = roster
        .companies_of_dev(&happiness)
        .into_iter()
        .map(|c| c.name.clone())
        .collect();
    let google_freebies = roster
        .freebies_of_company(&google)
        .into_iter()
        .map(|f| f.item_name.clone())
        .collect();
    let google_devs = roster
        .devs_of_company(&google)
        .into_iter()
        .map(|d| d.name.clone())
        .collect();

    let tshirt_details = roster.describe(&tshirt);

    // --- Company issues a new freebie ---
    let samuel_freebies_before = roster.item_names_of_dev(&samuel);
    let mut cap = google.issue_freebie(&samuel, "Google Cap", 25);
    db::insert_freebie(conn, &mut cap)?;
    let roster = Roster::load(conn)?;
    let samuel_freebies_after = roster.item_names_of_dev(&samuel);
    let new_freebie_details = roster.describe(&cap);

    // --- Aggregates ---
    let oldest_company = db::oldest_company(conn)?;
    let received_tshirt = roster.received_one(&happiness, "T-shirt");
    let received_laptop = roster.received_one(&happiness, "Laptop");

    // --- Give away something Happiness owns ---
    let happiness_before_give_away = roster.item_names_of_dev(&happiness);
    let emma_before_give_away = roster.item_names_of_dev(&emma);

    let mut tshirt = tshirt;
    let owned_give_away = happiness.give_away(&emma, &mut tshirt);
    db::save_freebie(conn, &tshirt)?;
    let roster = Roster::load(conn)?;

    let happiness_after_give_away = roster.item_names_of_dev(&happiness);
    let emma_after_give_away = roster.item_names_of_dev(&emma);
    let tshirt_owner_after = owner_name(&roster, "T-shirt")?;

    // --- Give away something Happiness does NOT own ---
    let mut sticker = sticker;
    let foreign_give_away = happiness.give_away(&emma, &mut sticker);
    db::save_freebie(conn, &sticker)?;
    let roster = Roster::load(conn)?;

    let sticker_owner_after = owner_name(&roster, "Sticker Pack")?;
    let happiness_final = roster.item_names_of_dev(&happiness);
    let emma_final = roster.item_names_of_dev(&emma);

    Ok(DebugReport {
        tshirt_owner,
        tshirt_issuer,
        happiness_freebies,
        happiness_companies,
        google_freebies,
        google_devs,
        tshirt_details,
        samuel_freebies_before,
        samuel_freebies_after,
        new_freebie_details,
        oldest_company,
        received_tshirt,
        received_laptop,
        happiness_before_give_away,
        emma_before_give_away,
        owned_give_away,
        happiness_after_give_away,
        emma_after_give_away,
        tshirt_owner_after,
        foreign_give_away,
        sticker_owner_after,
        happiness_final,
        emma_final,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_seed_basic() {
        let mut conn = test_conn();

        let summary = seed_database(&mut conn, SeedSet::Basic).unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                companies: 2,
                devs: 2,
                freebies: 3
            }
        );
        let roster = Roster::load(&conn).unwrap();
        let happiness = roster.dev_named("Happiness").unwrap();
        assert_eq!(roster.item_names_of_dev(happiness), vec!["T-shirt", "Diary"]);
    }

    #[test]
    fn test_seed_replaces_existing_data() {
        let mut conn = test_conn();

        seed_database(&mut conn, SeedSet::Debug).unwrap();
        seed_database(&mut conn, SeedSet::Debug).unwrap();

        let roster = Roster::load(&conn).unwrap();
        assert_eq!(roster.companies.len(), 3);
        assert_eq!(roster.devs.len(), 3);
        assert_eq!(roster.freebies.len(), 4);
    }

    #[test]
    fn test_debug_session_end_to_end() {
        let mut conn = test_conn();

        let report = run_debug_session(&mut conn).unwrap();

        // Relationships
        assert_eq!(report.tshirt_owner, "Happiness");
        assert_eq!(report.tshirt_issuer, "Google");
        assert_eq!(report.happiness_freebies, vec!["T-shirt", "Diary"]);
        assert_eq!(report.happiness_companies, vec!["Google", "Amazon"]);
        assert_eq!(report.google_freebies, vec!["T-shirt"]);
        assert_eq!(report.google_devs, vec!["Happiness"]);

        assert_eq!(report.tshirt_details, "Happiness owns a T-shirt from Google.");

        // Issuing
        assert_eq!(report.samuel_freebies_before, vec!["Sticker Pack", "Mousepad"]);
        assert_eq!(
            report.samuel_freebies_after,
            vec!["Sticker Pack", "Mousepad", "Google Cap"]
        );
        assert_eq!(report.new_freebie_details, "Samuel owns a Google Cap from Google.");

        // Aggregates
        assert_eq!(report.oldest_company.as_ref().unwrap().name, "Microsoft");
        assert!(report.received_tshirt);
        assert!(!report.received_laptop);

        // Owned give-away succeeds
        assert!(report.owned_give_away.is_transferred());
        assert_eq!(report.tshirt_owner_after, "Emma");
        assert_eq!(report.happiness_after_give_away, vec!["Diary"]);
        assert_eq!(report.emma_after_give_away, vec!["T-shirt"]);

        // Foreign give-away fails and changes nothing
        assert!(!report.foreign_give_away.is_transferred());
        assert_eq!(report.sticker_owner_after, "Samuel");
        assert_eq!(report.happiness_final, report.happiness_after_give_away);
        assert_eq!(report.emma_final, report.emma_after_give_away);
    }
}
