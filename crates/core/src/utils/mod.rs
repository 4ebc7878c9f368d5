pub mod identifiers;
pub mod time_utils;

pub use identifiers::parse_identifier;
