//! Orchestration loop: plan, dispatch, observe
//!
//! Planning failures are fatal because a broken model connection cannot
//! be recovered from inside the loop. Tool failures are routine; they
//! become observation text and the next planning round decides how to
//! react.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info, warn};

use crate::plan::Plan;
use crate::planner::Planner;
use crate::tools::ToolRegistry;

/// Who the agent is and how long it may run. Immutable for the lifetime
/// of one `Agent`.
#[derive(Debug, Clone)]
pub struct AgentIdentity {
    pub name: String,
    pub description: String,
    pub max_cycles: u32,
}

/// Terminal outcome of one `run` call. Never a panic or raw error: the
/// caller always gets one of these, serialized to the wire shapes below.
#[derive(Debug)]
pub enum RunOutcome {
    /// `{"result": …, "cycles": n}`
    Answer { result: String, cycles: u32 },
    /// `{"error": "Planning error: …"}`
    PlanningFailed { message: String },
    /// `{"error": "Could not get final answer after max cycles", …}`
    NotFinalized {
        last_plan: Plan,
        last_tool_output: String,
    },
    /// `{"error": "Finalisation failed: …", …}`
    FinalizationFailed {
        message: String,
        last_tool_output: String,
    },
}

impl RunOutcome {
    pub fn is_answer(&self) -> bool {
        matches!(self, RunOutcome::Answer { .. })
    }
}

impl Serialize for RunOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RunOutcome::Answer { result, cycles } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("result", result)?;
                map.serialize_entry("cycles", cycles)?;
                map.end()
            }
            RunOutcome::PlanningFailed { message } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &format!("Planning error: {}", message))?;
                map.end()
            }
            RunOutcome::NotFinalized {
                last_plan,
                last_tool_output,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("error", "Could not get final answer after max cycles")?;
                map.serialize_entry("lastPlan", last_plan)?;
                map.serialize_entry("lastToolOutput", last_tool_output)?;
                map.end()
            }
            RunOutcome::FinalizationFailed {
                message,
                last_tool_output,
            } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("error", &format!("Finalisation failed: {}", message))?;
                map.serialize_entry("lastToolOutput", last_tool_output)?;
                map.end()
            }
        }
    }
}

/// The single-agent orchestrator. The registry and planner are read-only
/// after construction, so concurrent `run` calls are independent; all
/// per-run state lives on `run`'s stack.
pub struct Agent {
    identity: AgentIdentity,
    planner: Planner,
    tools: ToolRegistry,
}

impl Agent {
    pub fn new(identity: AgentIdentity, planner: Planner, tools: ToolRegistry) -> Self {
        Self {
            identity,
            planner,
            tools,
        }
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Drive plan/dispatch cycles until a final answer, a fatal planning
    /// failure, or the cycle budget plus one forced-finalization round.
    pub async fn run(&self, user_input: &str, memory_text: &str) -> RunOutcome {
        let catalog = self.tools.describe_all();
        let mut cycle: u32 = 0;
        let mut last_tool_output = String::new();

        while cycle < self.identity.max_cycles {
            cycle += 1;
            debug!("cycle {} of {}", cycle, self.identity.max_cycles);

            let context = if last_tool_output.is_empty() {
                user_input.to_string()
            } else {
                format!(
                    "{}\n\nPrevious tool result:\n{}",
                    user_input, last_tool_output
                )
            };

            let plan = match self
                .planner
                .plan_once(&self.identity, &catalog, &context, memory_text)
                .await
            {
                Ok(plan) => plan,
                Err(e) => {
                    warn!("planning failed on cycle {}: {}", cycle, e);
                    return RunOutcome::PlanningFailed {
                        message: e.to_string(),
                    };
                }
            };

            if plan.is_final() {
                info!("final answer on cycle {}", cycle);
                return RunOutcome::Answer {
                    result: plan.action_input,
                    cycles: cycle,
                };
            }

            last_tool_output = self.dispatch(&plan).await;
        }

        self.force_finalize(user_input, memory_text, &catalog, cycle, last_tool_output)
            .await
    }

    /// Look up and execute the planned tool. Failures are observations,
    /// not errors: the diagnostic text goes back to the planner.
    async fn dispatch(&self, plan: &Plan) -> String {
        let Some(tool) = self.tools.get(&plan.action) else {
            warn!("planner chose unregistered tool {:?}", plan.action);
            return format!("Unknown tool: {}", plan.action);
        };

        debug!("dispatching tool {}", plan.action);
        match tool.invoke(&plan.action_input).await {
            Ok(output) => output.render(),
            Err(e) => {
                warn!("tool {} failed: {}", plan.action, e);
                format!("Tool {} failed: {}", plan.action, e)
            }
        }
    }

    /// Exactly one extra planning round after the budget is spent,
    /// instructing the model to answer with what it has.
    async fn force_finalize(
        &self,
        user_input: &str,
        memory_text: &str,
        catalog: &[String],
        cycles_used: u32,
        last_tool_output: String,
    ) -> RunOutcome {
        info!("cycle budget exhausted, forcing finalization");

        let final_prompt = format!(
            "{}\n\nLast tool result:\n{}\n\nPlease produce the FINAL_ANSWER now.",
            user_input, last_tool_output
        );

        match self
            .planner
            .plan_once(&self.identity, catalog, &final_prompt, memory_text)
            .await
        {
            Ok(plan) if plan.is_final() => RunOutcome::Answer {
                result: plan.action_input,
                cycles: cycles_used + 1,
            },
            Ok(plan) => RunOutcome::NotFinalized {
                last_plan: plan,
                last_tool_output,
            },
            Err(e) => RunOutcome::FinalizationFailed {
                message: e.to_string(),
                last_tool_output,
            },
        }
    }
}
