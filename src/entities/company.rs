// 🏢 Company Entity - the side that hands freebies out
//
// A company is created on its own and persisted before any freebie can
// reference it. Its freebies are not stored on the company: they are the rows
// of `freebies` whose company_id points here (see Roster::freebies_of_company).

use serde::{Deserialize, Serialize};

use super::dev::Dev;
use super::freebie::Freebie;

// ============================================================================
// COMPANY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Row id, assigned by storage on insert (None until persisted)
    pub id: Option<i64>,

    pub name: String,

    /// Any integer is accepted, negative and future years included
    pub founding_year: i64,
}

impl Company {
    /// Create a new, not yet persisted company
    pub fn new(name: impl Into<String>, founding_year: i64) -> Self {
        Company {
            id: None,
            name: name.into(),
            founding_year,
        }
    }

    /// Build a freebie issued by this company to `dev`.
    ///
    /// Both this company and `dev` must already be saved; the freebie copies
    /// their ids, and `db::insert_freebie` refuses one missing either. The
    /// freebie itself is NOT persisted here. Item name and value are taken as-is.
    pub fn issue_freebie(&self, dev: &Dev, item_name: impl Into<String>, value: i64) -> Freebie {
        Freebie {
            id: None,
            item_name: item_name.into(),
            value,
            dev_id: dev.id,
            company_id: self.id,
        }
    }

    /// Company with the smallest founding year.
    ///
    /// Ties go to the lowest id; companies without an id sort after persisted
    /// ones, and anything still tied keeps input order.
    pub fn oldest_company(companies: &[Company]) -> Option<&Company> {
        companies
            .iter()
            .min_by_key(|c| (c.founding_year, c.id.unwrap_or(i64::MAX)))
    }
}

// ============================================================================
// TESTS
// ============================================================================
