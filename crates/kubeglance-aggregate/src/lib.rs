//! Multi-context aggregation for kubeglance
//!
//! Walks every kubeconfig context, connects, lists namespaces and then the
//! pods of each namespace, folding failures into empty entries instead of
//! failing the whole pass.

mod aggregator;
mod dashboard;
mod sink;

pub use aggregator::Aggregator;
pub use dashboard::{Dashboard, KubeDashboard};
pub use sink::{FailureSink, MemorySink, TracingSink};

// Re-export types used in our public API
pub use kubeglance_types::{AggregationFailure, AggregationResult, ContextSnapshot, FailureKind};
