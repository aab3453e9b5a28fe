// 🎁 Freebie Entity - the item itself AND the Company↔Dev link
//
// Not a pure join table: it carries item_name and value. The references are
// plain foreign keys, and dev_id is the only one any operation reassigns.

use serde::{Deserialize, Serialize};

use super::company::Company;
use super::dev::Dev;

pub const UNKNOWN_DEV: &str = "unknown Dev";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Freebie {
    /// Row id, assigned by storage on insert (None until persisted)
    pub id: Option<i64>,

    pub item_name: String,

    /// Currency-agnostic quantity
    pub value: i64,

    /// Current owner (freebies.dev_id → devs.id)
    pub dev_id: Option<i64>,

    /// Issuer (freebies.company_id → companies.id)
    pub company_id: Option<i64>,
}

impl Freebie {
    /// Create a freebie with all references supplied directly
    pub fn new(item_name: impl Into<String>, value: i64, dev: &Dev, company: &Company) -> Self {
        Freebie {
            id: None,
            item_name: item_name.into(),
            value,
            dev_id: dev.id,
            company_id: company.id,
        }
    }

    /// `"<dev> owns a <item> from <company>."`
    ///
    /// `dev` and `company` are the already-resolved references; pass None when
    /// the reference is missing and a placeholder is used instead.
    pub fn describe(&self, dev: Option<&Dev>, company: Option<&Company>) -> String {
        let dev_name = dev.map(|d| d.name.as_str()).unwrap_or(UNKNOWN_DEV);
        let company_name = company.map(|c| c.name.as_str()).unwrap_or(UNKNOWN_COMPANY);
        format!("{} owns a {} from {}.", dev_name, self.item_name, company_name)
    }
}
