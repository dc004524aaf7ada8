pub mod level;
pub mod manager;
pub mod pods;
pub mod publisher;
pub mod status_reducer;
pub mod types;

pub use manager::{DEFAULT_QUEUE_CAPACITY, StatusManager};
pub use pods::PodsReport;
pub use publisher::{PublishOutcome, StatusPublisher};
pub use types::{Status, StatusLevel, WorkloadKind, WorkloadRef};
