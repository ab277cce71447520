pub mod records;

pub use records::{ErrorRecord, Record, records};
