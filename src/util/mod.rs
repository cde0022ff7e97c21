//! Utility types and helpers shared across the runtime.

pub mod ids;
pub mod serde_helpers;

pub use ids::{ActorKey, ChainId, ChildId, EnvelopeId, EnvelopeIdGenerator, SiloId, TypeId};
pub use serde_helpers::duration_serde;
