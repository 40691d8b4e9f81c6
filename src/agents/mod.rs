//! Research crew roster
//!
//! The research assistant is four cooperating agents: a supervisor that routes
//! work, a researcher that finds URLs, a scraper that reads them and a reporter
//! that writes the answer. Planning, routing and message history belong to the
//! external orchestration framework; this module only declares who the agents
//! are, what they are told and which tools each may call.

/// Agent specs and the default crew.
pub mod crew;
/// Built-in system prompts.
pub mod prompts;

pub use crew::{AgentRole, AgentSpec, ResearchCrew};
