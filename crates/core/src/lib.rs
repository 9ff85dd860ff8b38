//! Core domain model, parsers, search, and the address book itself.
//! No IO within this crate; persistence happens behind the [`Snapshot`] seam.

pub mod book;
pub mod errors;
pub mod parse;
pub mod record;
pub mod search;
pub mod traits;

pub use crate::book::{AddressBook, Matches};
pub use crate::errors::{CoreError, ParseError};
pub use crate::parse::{
    parse_date, parse_phone, parse_street, parse_street_pair, title_case, valid_email,
    PhoneNumber, PhoneRegion,
};
pub use crate::record::{Field, FieldValue, Record};
pub use crate::search::find_range;
pub use crate::traits::{DecisionProvider, RemovalChoice, Snapshot};
