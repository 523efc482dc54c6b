//! Quote Router Service
//!
//! Routing policy, failure classification, disambiguation and
//! minimum-amount resolution.

pub mod classifier;
pub mod messages;
pub mod orchestrator;
pub mod probe;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::{Classification, ErrorClassifier};
pub use orchestrator::{
	plan_route, select_best, OrchestratorConfig, QuoteOrchestrator, QuoteOrchestratorTrait,
	QuoteServiceError,
};
pub use probe::{DisambiguationProbe, ProbeConfig};
pub use resolver::{build_hint, MinAmountResolver, ResolverConfig};
