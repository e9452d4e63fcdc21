//! Agent registry and selection.
//!
//! - **Model**: agent records, types, and execution metrics
//! - **Registry**: id-indexed store with capacity and unique ids
//! - **Selection**: keyword-driven choice of agents for a task
//!
//! Agents are records only. Their type and capabilities decide which tasks
//! they get assigned to, never what a task produces.

pub mod model;
mod registry;
pub mod selection;

pub use model::{Agent, AgentType};
pub use registry::AgentRegistry;
pub use selection::select_agents;
