//! Field-aware text logic for a bibliography manager: ordering records by a named field, and
//! cleaning links pulled out of bibliographic metadata.

pub mod comparator;
pub mod doi;
pub mod item;
pub mod link;
pub mod text;
