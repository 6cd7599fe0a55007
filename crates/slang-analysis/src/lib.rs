//! Complexity metrics and property verification over Slang CFGs.

pub mod metrics;
pub mod verify;

pub use metrics::{function_metrics, module_metrics, ComplexityDistribution, FunctionMetrics, ModuleMetrics};
pub use verify::{PropertyStatus, PropertyVerifier, VerificationResult};
