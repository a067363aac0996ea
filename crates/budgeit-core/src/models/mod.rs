//! Finance models exchanged with the budge-it API.
//!
//! These are payload shapes only; the session client passes them through
//! without interpreting them. Field names are camelCase on the wire.

mod currency;
mod group;
mod pocket;
mod transaction;
mod user;

pub use currency::format_currency;
pub use group::{NewPocketGroup, PocketGroup};
pub use pocket::{NewPocket, Pocket, PocketUpdate};
pub use transaction::{NewTransaction, Transaction};
pub use user::{LoginResponse, RenameTag, User, UserRegister};
