//! Record lifecycle: approval policy, status transitions, and the engine
//! that orchestrates them.

pub mod approval;
pub mod engine;
pub mod error;
pub mod transitions;

#[cfg(test)]
mod transition_props;

pub use approval::ApprovalPolicy;
pub use engine::{RecordFilter, TransactionWorkflowEngine};
pub use error::EngineError;
pub use transitions::Transitions;
