// Entity Models
//
// Company and Dev are independent records; Freebie links one of each and
// carries its own attributes. References are foreign-key ids, resolved
// through `db` queries or a loaded `Roster`.

pub mod company;
pub mod dev;
pub mod freebie;

pub use company::Company;
pub use dev::{Dev, GiveAway};
pub use freebie::{Freebie, UNKNOWN_COMPANY, UNKNOWN_DEV};
