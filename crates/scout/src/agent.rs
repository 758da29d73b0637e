use anyhow::Result;

use crate::errors::{AgentError, AgentResult};
use crate::models::message::{Message, ToolRequest};
use crate::outcome::AgentOutcome;
use crate::prompt_template::{load_prompt, PromptContext};
use crate::providers::base::Provider;
use crate::tool::Tool;
use crate::tools::ToolSet;

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Output of a run that used up its iterations without a final answer
pub const ITERATION_LIMIT_OUTPUT: &str = "Agent stopped due to iteration limit or time limit.";

/// One tool use performed during a run
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub tool: String,
    pub input: String,
    pub output: String,
}

/// Agent pairs a model provider with the tools it may call.
///
/// The model decides which tool to call and when to stop; the agent only
/// executes the requested calls, one at a time, and feeds the results back.
pub struct Agent {
    provider: Box<dyn Provider>,
    tools: ToolSet,
    definitions: Vec<Tool>,
    system_prompt: String,
    max_iterations: usize,
}

impl Agent {
    /// Create an agent whose system prompt is rendered from `prompt_template`
    pub fn new(
        provider: Box<dyn Provider>,
        tools: ToolSet,
        prompt_template: &str,
        max_iterations: usize,
    ) -> AgentResult<Self> {
        let definitions = tools.definitions();
        let system_prompt = load_prompt(
            prompt_template,
            &PromptContext::new(&definitions, max_iterations),
        )
        .map_err(|e| AgentError::Internal(format!("Failed to render system prompt: {}", e)))?;

        Ok(Self {
            provider,
            tools,
            definitions,
            system_prompt,
            max_iterations,
        })
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Dispatch a single tool call. Always produces an observation for the model.
    async fn dispatch_tool_call(&self, request: &ToolRequest) -> ToolInvocation {
        let call = match &request.tool_call {
            Ok(call) => call,
            Err(e) => {
                tracing::warn!(id = %request.id, error = %e, "rejected tool request");
                return ToolInvocation {
                    tool: String::new(),
                    input: String::new(),
                    output: e.to_string(),
                };
            }
        };

        let input = call.text_input();
        let output = match self.tools.get(&call.name) {
            Some(tool) => tool.run(&input).await,
            None => {
                let error = AgentError::ToolNotFound(call.name.clone());
                tracing::warn!(error = %error, "model asked for an unknown tool");
                format!(
                    "{} is not a valid tool, try one of [{}].",
                    call.name,
                    self.tools.names().join(", ")
                )
            }
        };

        ToolInvocation {
            tool: call.name.clone(),
            input,
            output,
        }
    }

    /// Answer `input`, returning the outcome and every tool use along the way
    pub async fn run_with_trace(&self, input: &str) -> Result<(AgentOutcome, Vec<ToolInvocation>)> {
        let mut messages = vec![Message::user().with_text(input)];
        let mut trace = Vec::new();

        for iteration in 1..=self.max_iterations {
            let (response, usage) = self
                .provider
                .complete(&self.system_prompt, &messages, &self.definitions)
                .await?;
            tracing::debug!(iteration, ?usage, "model replied");

            let requests: Vec<ToolRequest> =
                response.tool_requests().into_iter().cloned().collect();
            let thought = response.text();
            messages.push(response);

            if requests.is_empty() {
                tracing::info!(iteration, "final answer");
                return Ok((AgentOutcome::finished(input, thought), trace));
            }
            if !thought.is_empty() {
                tracing::info!(iteration, thought = %thought, "thinking");
            }

            let mut tool_response = Message::user();
            for request in &requests {
                let invocation = self.dispatch_tool_call(request).await;
                tracing::info!(
                    iteration,
                    tool = %invocation.tool,
                    input = %invocation.input,
                    observation = %invocation.output,
                    "tool call"
                );
                tool_response = tool_response.with_tool_response(
                    request.id.clone(),
                    invocation.tool.clone(),
                    invocation.output.clone(),
                );
                trace.push(invocation);
            }
            messages.push(tool_response);
        }

        tracing::warn!(
            error = %AgentError::IterationLimit(self.max_iterations),
            "no final answer"
        );
        Ok((AgentOutcome::finished(input, ITERATION_LIMIT_OUTPUT), trace))
    }

    /// Answer `input`
    pub async fn run(&self, input: &str) -> Result<AgentOutcome> {
        let (outcome, _) = self.run_with_trace(input).await?;
        Ok(outcome)
    }
}
