mod types;

pub use types::{StatusConfig, parse_related_objects, parse_workload_refs};
