//! Field-value normalizers used when ordering records.

pub mod date;
pub mod name;

pub use date::{month_number, to_four_digit_year};
pub use name::fix_author_for_alphabetization;
