//! Domain records decoded from command replies.

mod cluster;
mod geo;
mod json;
mod memory;
mod pipeline;
mod pubsub;
mod scan;
mod score;
mod search;
mod status;
mod stream;

pub use cluster::{ClusterNode, ClusterNodes};
pub use geo::GeoPos;
pub use json::JsonValue;
pub use memory::MemoryInfo;
pub use pipeline::PipelineResult;
pub use pubsub::Subscription;
pub use scan::ScanPage;
pub use score::{Score, ScoreMember};
pub use search::{SearchDocument, SearchResults};
pub use status::Status;
pub use stream::{StreamEntry, StreamId};
