// Freebie Tracker - Core Library
// Companies hand out freebies, devs receive and pass them on.
// SQLite (via rusqlite) is the storage; entities never write on their own.

pub mod db;
pub mod entities;
pub mod logging;
pub mod roster;
pub mod seed;

// Re-export commonly used types
pub use db::{
    FreebieRecord,
    open_database, setup_database, with_transaction,
    insert_company, insert_dev, insert_freebie, save_freebie, refresh_freebie, delete_all,
    get_company, get_dev, get_freebie,
    find_company_by_name, find_dev_by_name, find_freebie_by_item_name,
    get_all_companies, get_all_devs, get_all_freebies,
    get_freebies_for_dev, get_freebies_for_company, oldest_company, verify_count,
    load_freebie_csv, import_freebies,
};
pub use entities::{Company, Dev, Freebie, GiveAway, UNKNOWN_COMPANY, UNKNOWN_DEV};
pub use roster::Roster;
pub use seed::{DebugReport, SeedSet, SeedSummary, run_debug_session, seed_database};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
