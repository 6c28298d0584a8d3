//! Single-agent orchestration core
//!
//! Plan-act-observe loop: the planner asks a model to pick a tool or a
//! final answer, the loop dispatches the tool and feeds its output back
//! into the next planning round until an answer or the cycle budget runs
//! out.

pub mod loop_agent;
pub mod plan;
pub mod planner;
pub mod tools;

pub use loop_agent::{Agent, AgentIdentity, RunOutcome};
pub use plan::{parse_plan, Plan, PlanParseError, FINAL_ANSWER};
pub use planner::{PlanError, Planner, ProviderSlot};
pub use tools::{Tool, ToolOutput, ToolRegistry};
