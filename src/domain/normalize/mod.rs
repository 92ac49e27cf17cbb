//! Normalizers for free-text answers.
//!
//! - `temporal` - date phrases to calendar dates
//! - `currency` - amount phrases to numbers

mod currency;
mod temporal;

pub use currency::parse_amount;
pub use temporal::{parse_date, parse_date_from};
