//! The orchestration loop of unitchat.
//!
//! One user turn follows a **propose → execute → observe** cycle:
//!
//! 1. **Send** the working transcript and the tool descriptors to the model
//! 2. **If tool calls**: run them all, append the results in request order, go to 1
//! 3. **If text only**: the turn is complete
//!
//! The loop also stops after a fixed number of model calls; such a turn is
//! reported as [`TurnStatus::Capped`].

pub mod loop_runner;

pub use loop_runner::{AgentLoop, DEFAULT_MAX_ITERATIONS, TurnOutcome, TurnStatus};
