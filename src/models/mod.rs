pub mod boundary;
pub mod ec;

pub use boundary::{BoundaryResult, NOT_SPECIFIED};
pub use ec::{CaseRecord, EcEntry, ParsedEntry, SearchParams};
