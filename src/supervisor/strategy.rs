//! Supervision strategy implementations (§4.8): `OneForOne`, `OneForAll`, `RestForOne`.

// Layer 1: Standard library imports
// (none needed)

// Layer 2: Third-party crate imports
// (none needed)

// Layer 3: Internal module imports
use super::traits::SupervisionStrategy;
use super::types::{StrategyContext, SupervisionDecision};

/// Restart only the child that failed; siblings are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneForOne;

impl SupervisionStrategy for OneForOne {
    fn determine_decision(context: StrategyContext) -> SupervisionDecision {
        match context {
            StrategyContext::SingleFailure {
                failed_child_id, ..
            } => SupervisionDecision::RestartChild(failed_child_id),
            StrategyContext::ManualRestart { child_id } => {
                SupervisionDecision::RestartChild(child_id)
            }
            StrategyContext::Shutdown { .. } => SupervisionDecision::StopAll,
        }
    }
}

/// Restart every child in the group whenever any one of them fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneForAll;

impl SupervisionStrategy for OneForAll {
    fn determine_decision(context: StrategyContext) -> SupervisionDecision {
        match context {
            StrategyContext::SingleFailure { all_child_ids, .. } => {
                SupervisionDecision::RestartAll(all_child_ids)
            }
            StrategyContext::ManualRestart { child_id } => {
                SupervisionDecision::RestartChild(child_id)
            }
            StrategyContext::Shutdown { .. } => SupervisionDecision::StopAll,
        }
    }
}

/// Restart the failed child and every sibling registered after it, in
/// registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestForOne;

impl SupervisionStrategy for RestForOne {
    fn determine_decision(context: StrategyContext) -> SupervisionDecision {
        match context {
            StrategyContext::SingleFailure {
                failed_child_id,
                all_child_ids,
            } => {
                let position = all_child_ids
                    .iter()
                    .position(|id| *id == failed_child_id)
                    .unwrap_or(0);
                SupervisionDecision::RestartSubset(all_child_ids[position..].to_vec())
            }
            StrategyContext::ManualRestart { child_id } => {
                SupervisionDecision::RestartChild(child_id)
            }
            StrategyContext::Shutdown { .. } => SupervisionDecision::StopAll,
        }
    }
}
