use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::entities::{Company, Dev, Freebie};

// ============================================================================
// SCHEMA
// ============================================================================

/// Open (or create) a database file and make sure the schema exists
pub fn open_database(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // SQLite leaves foreign keys off unless asked, per connection
    conn.pragma_update(None, "foreign_keys", true)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS companies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            founding_year INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS devs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Freebies: the association between companies and devs.
    // The two named foreign keys are the persisted contract.
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS freebies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_name TEXT NOT NULL,
            value INTEGER NOT NULL,
            dev_id INTEGER,
            company_id INTEGER,
            CONSTRAINT fk_freebies_dev_id_devs
                FOREIGN KEY (dev_id) REFERENCES devs (id),
            CONSTRAINT fk_freebies_company_id_companies
                FOREIGN KEY (company_id) REFERENCES companies (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_freebies_dev_id ON freebies(dev_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_freebies_company_id ON freebies(company_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_companies_founding_year ON companies(founding_year)",
        [],
    )?;

    Ok(())
}

/// Run `f` inside one SQLite transaction; commits only if `f` succeeds
pub fn with_transaction<T, F>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T>,
{
    let tx = conn.transaction().context("Failed to begin transaction")?;
    let value = f(&tx)?;
    tx.commit().context("Failed to commit transaction")?;
    Ok(value)
}

// ============================================================================
// ROW MAPPING
// ============================================================================

const COMPANY_COLUMNS: &str = "id, name, founding_year";
const DEV_COLUMNS: &str = "id, name";
const FREEBIE_COLUMNS: &str = "id, item_name, value, dev_id, company_id";

fn company_from_row(row: &Row) -> rusqlite::Result<Company> {
    Ok(Company {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        founding_year: row.get(2)?,
    })
}

fn dev_from_row(row: &Row) -> rusqlite::Result<Dev> {
    Ok(Dev {
        id: Some(row.get(0)?),
        name: row.get(1)?,
    })
}

fn freebie_from_row(row: &Row) -> rusqlite::Result<Freebie> {
    Ok(Freebie {
        id: Some(row.get(0)?),
        item_name: row.get(1)?,
        value: row.get(2)?,
        dev_id: row.get(3)?,
        company_id: row.get(4)?,
    })
}

// ============================================================================
// CREATE
// ============================================================================

/// Insert a company and store the assigned id back on it
pub fn insert_company(conn: &Connection, company: &mut Company) -> Result<i64> {
    if let Some(id) = company.id {
        bail!("Company {} is already persisted with id {}", company.name, id);
    }

    conn.execute(
        "INSERT INTO companies (name, founding_year) VALUES (?1, ?2)",
        params![company.name, company.founding_year],
    )
    .with_context(|| format!("Failed to insert company {}", company.name))?;

    let id = conn.last_insert_rowid();
    company.id = Some(id);
    debug!(id, name = %company.name, "inserted company");
    Ok(id)
}

/// Insert a dev and store the assigned id back on it
pub fn insert_dev(conn: &Connection, dev: &mut Dev) -> Result<i64> {
    if let Some(id) = dev.id {
        bail!("Dev {} is already persisted with id {}", dev.name, id);
    }

    conn.execute("INSERT INTO devs (name) VALUES (?1)", params![dev.name])
        .with_context(|| format!("Failed to insert dev {}", dev.name))?;

    let id = conn.last_insert_rowid();
    dev.id = Some(id);
    debug!(id, name = %dev.name, "inserted dev");
    Ok(id)
}

/// Insert a freebie and store the assigned id back on it.
///
/// Its dev and company must be saved first: a missing dev_id or company_id is
/// rejected here, and one pointing at a row that does not exist fails the
/// foreign key.
pub fn insert_freebie(conn: &Connection, freebie: &mut Freebie) -> Result<i64> {
    if let Some(id) = freebie.id {
        bail!("Freebie {} is already persisted with id {}", freebie.item_name, id);
    }
    if freebie.dev_id.is_none() {
        bail!("Freebie {} has no dev; save the dev before issuing", freebie.item_name);
    }
    if freebie.company_id.is_none() {
        bail!("Freebie {} has no company; save the company before issuing", freebie.item_name);
    }

    conn.execute(
        "INSERT INTO freebies (item_name, value, dev_id, company_id) VALUES (?1, ?2, ?3, ?4)",
        params![
            freebie.item_name,
            freebie.value,
            freebie.dev_id,
            freebie.company_id
        ],
    )
    .with_context(|| format!("Failed to insert freebie {}", freebie.item_name))?;

    let id = conn.last_insert_rowid();
    freebie.id = Some(id);
    debug!(id, item = %freebie.item_name, "inserted freebie");
    Ok(id)
}

// ============================================================================
// UPDATE / REFRESH
// ============================================================================

/// Write an in-memory freebie back to its row (commits a give-away)
pub fn save_freebie(conn: &Connection, freebie: &Freebie) -> Result<()> {
    let Some(id) = freebie.id else {
        bail!("Freebie {} has not been inserted yet", freebie.item_name);
    };

    let updated = conn
        .execute(
            "UPDATE freebies
             SET item_name = ?1, value = ?2, dev_id = ?3, company_id = ?4
             WHERE id = ?5",
            params![
                freebie.item_name,
                freebie.value,
                freebie.dev_id,
                freebie.company_id,
                id
            ],
        )
        .with_context(|| format!("Failed to save freebie {}", id))?;

    if updated == 0 {
        bail!("Freebie {} no longer exists", id);
    }

    debug!(id, dev_id = ?freebie.dev_id, "saved freebie");
    Ok(())
}

/// Reload a freebie's fields from its row
pub fn refresh_freebie(conn: &Connection, freebie: &mut Freebie) -> Result<()> {
    let Some(id) = freebie.id else {
        bail!("Freebie {} has not been inserted yet", freebie.item_name);
    };

    match get_freebie(conn, id)? {
        Some(fresh) => {
            *freebie = fresh;
            Ok(())
        }
        None => bail!("Freebie {} no longer exists", id),
    }
}

// ============================================================================
// DELETE
// ============================================================================

/// Bulk teardown of all three tables, children first
pub fn delete_all(conn: &Connection) -> Result<()> {
    let freebies = conn.execute("DELETE FROM freebies", [])?;
    let devs = conn.execute("DELETE FROM devs", [])?;
    let companies = conn.execute("DELETE FROM companies", [])?;

    info!(freebies, devs, companies, "cleared existing data");
    Ok(())
}

// ============================================================================
// READ
// ============================================================================

pub fn get_company(conn: &Connection, id: i64) -> Result<Option<Company>> {
    let company = conn
        .query_row(
            &format!("SELECT {} FROM companies WHERE id = ?1", COMPANY_COLUMNS),
            params![id],
            company_from_row,
        )
        .optional()?;
    Ok(company)
}

pub fn get_dev(conn: &Connection, id: i64) -> Result<Option<Dev>> {
    let dev = conn
        .query_row(
            &format!("SELECT {} FROM devs WHERE id = ?1", DEV_COLUMNS),
            params![id],
            dev_from_row,
        )
        .optional()?;
    Ok(dev)
}

pub fn get_freebie(conn: &Connection, id: i64) -> Result<Option<Freebie>> {
    let freebie = conn
        .query_row(
            &format!("SELECT {} FROM freebies WHERE id = ?1", FREEBIE_COLUMNS),
            params![id],
            freebie_from_row,
        )
        .optional()?;
    Ok(freebie)
}

/// First company (lowest id) with this exact name
pub fn find_company_by_name(conn: &Connection, name: &str) -> Result<Option<Company>> {
    let company = conn
        .query_row(
            &format!(
                "SELECT {} FROM companies WHERE name = ?1 ORDER BY id LIMIT 1",
                COMPANY_COLUMNS
            ),
            params![name],
            company_from_row,
        )
        .optional()?;
    Ok(company)
}

/// First dev (lowest id) with this exact name
pub fn find_dev_by_name(conn: &Connection, name: &str) -> Result<Option<Dev>> {
    let dev = conn
        .query_row(
            &format!(
                "SELECT {} FROM devs WHERE name = ?1 ORDER BY id LIMIT 1",
                DEV_COLUMNS
            ),
            params![name],
            dev_from_row,
        )
        .optional()?;
    Ok(dev)
}

/// First freebie (lowest id) with this exact item name
pub fn find_freebie_by_item_name(conn: &Connection, item_name: &str) -> Result<Option<Freebie>> {
    let freebie = conn
        .query_row(
            &format!(
                "SELECT {} FROM freebies WHERE item_name = ?1 ORDER BY id LIMIT 1",
                FREEBIE_COLUMNS
            ),
            params![item_name],
            freebie_from_row,
        )
        .optional()?;
    Ok(freebie)
}

pub fn get_all_companies(conn: &Connection) -> Result<Vec<Company>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM companies ORDER BY id",
        COMPANY_COLUMNS
    ))?;

    let companies = stmt
        .query_map([], company_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(companies)
}

pub fn get_all_devs(conn: &Connection) -> Result<Vec<Dev>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM devs ORDER BY id", DEV_COLUMNS))?;

    let devs = stmt
        .query_map([], dev_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(devs)
}

pub fn get_all_freebies(conn: &Connection) -> Result<Vec<Freebie>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM freebies ORDER BY id",
        FREEBIE_COLUMNS
    ))?;

    let freebies = stmt
        .query_map([], freebie_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(freebies)
}

/// Freebies currently owned by a dev (Dev.freebies)
pub fn get_freebies_for_dev(conn: &Connection, dev_id: i64) -> Result<Vec<Freebie>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM freebies WHERE dev_id = ?1 ORDER BY id",
        FREEBIE_COLUMNS
    ))?;

    let freebies = stmt
        .query_map(params![dev_id], freebie_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(freebies)
}

/// Freebies issued by a company (Company.freebies)
pub fn get_freebies_for_company(conn: &Connection, company_id: i64) -> Result<Vec<Freebie>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM freebies WHERE company_id = ?1 ORDER BY id",
        FREEBIE_COLUMNS
    ))?;

    let freebies = stmt
        .query_map(params![company_id], freebie_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(freebies)
}

/// Sorted query: smallest founding year, ties to the lowest id
pub fn oldest_company(conn: &Connection) -> Result<Option<Company>> {
    let company = conn
        .query_row(
            &format!(
                "SELECT {} FROM companies ORDER BY founding_year ASC, id ASC LIMIT 1",
                COMPANY_COLUMNS
            ),
            [],
            company_from_row,
        )
        .optional()?;
    Ok(company)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM freebies", [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// CSV IMPORT
// ============================================================================

/// One CSV row: a freebie plus the names of its owner and issuer
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FreebieRecord {
    pub item_name: String,
    pub value: i64,
    pub dev: String,
    pub company: String,
    /// Only used when the company does not exist yet
    pub founding_year: i64,
}

pub fn load_freebie_csv(csv_path: &Path) -> Result<Vec<FreebieRecord>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: FreebieRecord = result.context("Failed to deserialize freebie row")?;
        records.push(record);
    }

    Ok(records)
}

/// Insert one freebie per record, creating missing devs and companies by name.
///
/// All rows go in one transaction: a failure leaves the database untouched.
pub fn import_freebies(conn: &mut Connection, records: &[FreebieRecord]) -> Result<usize> {
    let (inserted, new_devs, new_companies) = with_transaction(conn, |tx| {
        let mut inserted = 0;
        let mut new_devs = 0;
        let mut new_companies = 0;

        for record in records {
            let dev = match find_dev_by_name(tx, &record.dev)? {
                Some(dev) => dev,
                None => {
                    let mut dev = Dev::new(record.dev.as_str());
                    insert_dev(tx, &mut dev)?;
                    new_devs += 1;
                    dev
                }
            };

            let company = match find_company_by_name(tx, &record.company)? {
                Some(company) => company,
                None => {
                    let mut company = Company::new(record.company.as_str(), record.founding_year);
                    insert_company(tx, &mut company)?;
                    new_companies += 1;
                    company
                }
            };

            let mut freebie = company.issue_freebie(&dev, record.item_name.as_str(), record.value);
            insert_freebie(tx, &mut freebie)
                .with_context(|| format!("Failed to import row for {}", record.item_name))?;
            inserted += 1;
        }

        Ok((inserted, new_devs, new_companies))
    })?;

    info!(inserted, new_devs, new_companies, "imported freebies");

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_assigns_ids() {
        let conn = test_conn();

        let mut google = Company::new("Google", 1998);
        let mut happiness = Dev::new("Happiness");
        insert_company(&conn, &mut google).unwrap();
        insert_dev(&conn, &mut happiness).unwrap();

        assert!(google.id.is_some());
        assert!(happiness.id.is_some());

        let mut tshirt = google.issue_freebie(&happiness, "T-shirt", 10);
        insert_freebie(&conn, &mut tshirt).unwrap();
        assert!(tshirt.id.is_some());

        let loaded = get_freebie(&conn, tshirt.id.unwrap()).unwrap().unwrap();
        assert_eq!(loaded, tshirt);
        assert_eq!(verify_count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_insert_twice_is_rejected() {
        let conn = test_conn();

        let mut google = Company::new("Google", 1998);
        insert_company(&conn, &mut google).unwrap();

        assert!(insert_company(&conn, &mut google).is_err());
        assert_eq!(get_all_companies(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_foreign_keys_are_enforced() {
        let conn = test_conn();

        let mut orphan = Freebie {
            id: None,
            item_name: "Ghost Mug".to_string(),
            value: 1,
            dev_id: Some(999),
            company_id: Some(999),
        };

        assert!(insert_freebie(&conn, &mut orphan).is_err());
        assert_eq!(verify_count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_insert_freebie_requires_saved_parties() {
        let conn = test_conn();

        let mut google = Company::new("Google", 1998);
        let mut happiness = Dev::new("Happiness");
        insert_company(&conn, &mut google).unwrap();

        // Dev not saved yet
        let mut lanyard = google.issue_freebie(&happiness, "Lanyard", 2);
        assert!(insert_freebie(&conn, &mut lanyard).is_err());
        assert_eq!(lanyard.id, None);

        // Company not saved yet
        insert_dev(&conn, &mut happiness).unwrap();
        let unsaved = Company::new("Startup", 2020);
        let mut pin = unsaved.issue_freebie(&happiness, "Pin", 1);
        assert!(insert_freebie(&conn, &mut pin).is_err());

        assert_eq!(verify_count(&conn).unwrap(), 0);

        // Both saved: the references survive the round trip
        let mut lanyard = google.issue_freebie(&happiness, "Lanyard", 2);
        insert_freebie(&conn, &mut lanyard).unwrap();
        let loaded = find_freebie_by_item_name(&conn, "Lanyard").unwrap().unwrap();
        assert_eq!(loaded.dev_id, happiness.id);
        assert_eq!(loaded.company_id, google.id);
    }

    #[test]
    fn test_schema_foreign_key_contract() {
        let conn = test_conn();

        let sql: String = conn
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'freebies'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(sql.contains("fk_freebies_dev_id_devs"));
        assert!(sql.contains("fk_freebies_company_id_companies"));

        let mut stmt = conn.prepare("PRAGMA foreign_key_list(freebies)").unwrap();
        let mut links: Vec<(String, String, String)> = stmt
            .query_map([], |row| Ok((row.get(2)?, row.get(3)?, row.get(4)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        links.sort();

        assert_eq!(
            links,
            vec![
                ("companies".to_string(), "company_id".to_string(), "id".to_string()),
                ("devs".to_string(), "dev_id".to_string(), "id".to_string()),
            ]
        );
    }

    #[test]
    fn test_save_and_refresh_freebie() {
        let conn = test_conn();

        let mut google = Company::new("Google", 1998);
        let mut happiness = Dev::new("Happiness");
        let mut emma = Dev::new("Emma");
        insert_company(&conn, &mut google).unwrap();
        insert_dev(&conn, &mut happiness).unwrap();
        insert_dev(&conn, &mut emma).unwrap();

        let mut tshirt = google.issue_freebie(&happiness, "T-shirt", 10);
        insert_freebie(&conn, &mut tshirt).unwrap();

        // A second in-memory copy, like a second session holding the row
        let mut other_copy = get_freebie(&conn, tshirt.id.unwrap()).unwrap().unwrap();

        happiness.give_away(&emma, &mut tshirt);
        // Not committed yet
        assert_eq!(
            get_freebies_for_dev(&conn, emma.id.unwrap()).unwrap().len(),
            0
        );

        save_freebie(&conn, &tshirt).unwrap();
        assert_eq!(other_copy.dev_id, happiness.id);

        refresh_freebie(&conn, &mut other_copy).unwrap();
        assert_eq!(other_copy.dev_id, emma.id);
        assert_eq!(
            get_freebies_for_dev(&conn, emma.id.unwrap()).unwrap().len(),
            1
        );
        assert!(get_freebies_for_dev(&conn, happiness.id.unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_save_unpersisted_freebie_fails() {
        let conn = test_conn();
        let loose = Freebie {
            id: None,
            item_name: "Pin".to_string(),
            value: 1,
            dev_id: None,
            company_id: None,
        };

        assert!(save_freebie(&conn, &loose).is_err());
    }

    #[test]
    fn test_find_by_attribute() {
        let conn = test_conn();

        let mut amazon = Company::new("Amazon", 1994);
        let mut samuel = Dev::new("Samuel");
        insert_company(&conn, &mut amazon).unwrap();
        insert_dev(&conn, &mut samuel).unwrap();
        let mut sticker = amazon.issue_freebie(&samuel, "Sticker Pack", 5);
        insert_freebie(&conn, &mut sticker).unwrap();

        assert_eq!(find_company_by_name(&conn, "Amazon").unwrap(), Some(amazon.clone()));
        assert_eq!(find_dev_by_name(&conn, "Samuel").unwrap(), Some(samuel.clone()));
        assert_eq!(
            find_freebie_by_item_name(&conn, "Sticker Pack").unwrap(),
            Some(sticker)
        );

        assert!(find_company_by_name(&conn, "amazon").unwrap().is_none());
        assert!(find_dev_by_name(&conn, "Emma").unwrap().is_none());
        assert_eq!(
            get_freebies_for_company(&conn, amazon.id.unwrap()).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_oldest_company_query() {
        let conn = test_conn();
        assert!(oldest_company(&conn).unwrap().is_none());

        for (name, year) in [("Google", 1998), ("Amazon", 1994), ("Microsoft", 1975)] {
            let mut company = Company::new(name, year);
            insert_company(&conn, &mut company).unwrap();
        }

        let oldest = oldest_company(&conn).unwrap().unwrap();
        assert_eq!(oldest.name, "Microsoft");

        // Storage query and in-memory query agree
        let all = get_all_companies(&conn).unwrap();
        assert_eq!(Company::oldest_company(&all), Some(&oldest));
    }

    #[test]
    fn test_delete_all() {
        let conn = test_conn();

        let mut google = Company::new("Google", 1998);
        let mut happiness = Dev::new("Happiness");
        insert_company(&conn, &mut google).unwrap();
        insert_dev(&conn, &mut happiness).unwrap();
        let mut tshirt = google.issue_freebie(&happiness, "T-shirt", 10);
        insert_freebie(&conn, &mut tshirt).unwrap();

        delete_all(&conn).unwrap();

        assert!(get_all_companies(&conn).unwrap().is_empty());
        assert!(get_all_devs(&conn).unwrap().is_empty());
        assert!(get_all_freebies(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_with_transaction_rolls_back_on_error() {
        let mut conn = test_conn();

        let result: Result<()> = with_transaction(&mut conn, |tx| {
            let mut google = Company::new("Google", 1998);
            insert_company(tx, &mut google)?;
            bail!("abort after insert");
        });

        assert!(result.is_err());
        assert!(get_all_companies(&conn).unwrap().is_empty());

        with_transaction(&mut conn, |tx| {
            let mut amazon = Company::new("Amazon", 1994);
            insert_company(tx, &mut amazon)
        })
        .unwrap();
        assert_eq!(get_all_companies(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_import_freebies_from_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "item_name,value,dev,company,founding_year").unwrap();
        writeln!(file, "T-shirt,10,Happiness,Google,1998").unwrap();
        writeln!(file, "Diary,15,Happiness,Amazon,1994").unwrap();
        writeln!(file, "Sticker Pack,5,Samuel,Amazon,1994").unwrap();
        file.flush().unwrap();

        let records = load_freebie_csv(file.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].item_name, "T-shirt");

        let mut conn = test_conn();
        let inserted = import_freebies(&mut conn, &records).unwrap();

        assert_eq!(inserted, 3);
        assert_eq!(verify_count(&conn).unwrap(), 3);
        // Devs and companies are reused by name
        assert_eq!(get_all_devs(&conn).unwrap().len(), 2);
        assert_eq!(get_all_companies(&conn).unwrap().len(), 2);

        let happiness = find_dev_by_name(&conn, "Happiness").unwrap().unwrap();
        let owned = get_freebies_for_dev(&conn, happiness.id.unwrap()).unwrap();
        assert!(happiness.received_one(&owned, "Diary"));
    }

    #[test]
    fn test_import_failure_rolls_back_earlier_rows() {
        let mut conn = test_conn();
        conn.execute_batch(
            "CREATE TRIGGER reject_boom BEFORE INSERT ON freebies
             WHEN NEW.item_name = 'Boom'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

        let records = vec![
            FreebieRecord {
                item_name: "T-shirt".to_string(),
                value: 10,
                dev: "Happiness".to_string(),
                company: "Google".to_string(),
                founding_year: 1998,
            },
            FreebieRecord {
                item_name: "Boom".to_string(),
                value: 1,
                dev: "Samuel".to_string(),
                company: "Amazon".to_string(),
                founding_year: 1994,
            },
        ];

        assert!(import_freebies(&mut conn, &records).is_err());

        assert_eq!(verify_count(&conn).unwrap(), 0);
        assert!(get_all_devs(&conn).unwrap().is_empty());
        assert!(get_all_companies(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_open_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freebies.db");

        {
            let conn = open_database(&path).unwrap();
            let mut google = Company::new("Google", 1998);
            insert_company(&conn, &mut google).unwrap();
        }

        // Reopening keeps data and doesn't fail on existing tables
        let conn = open_database(&path).unwrap();
        assert_eq!(get_all_companies(&conn).unwrap().len(), 1);
    }
}
