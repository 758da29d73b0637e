use anyhow::{Context, Result};
use scout::agent::Agent;
use scout::config::ConfigFromEnv;
use scout::prompt_template::read_prompt_file;
use scout::providers::configs::GeminiProviderConfig;
use scout::providers::gemini::GeminiProvider;
use scout::tools::ToolSet;

use crate::RunOptions;

pub mod media;
pub mod service;

/// Wire the Gemini provider, the tools and the prompt into an agent
pub(crate) fn build_agent(
    options: &RunOptions,
    tools: ToolSet,
    default_prompt: &str,
) -> Result<Agent> {
    let mut config = GeminiProviderConfig::from_env()?;
    if let Some(model) = &options.model {
        config = config.with_model(model);
    }
    let provider = GeminiProvider::new(config)?;
    tracing::info!(model = provider.model(), "using gemini");

    let template = match &options.prompt {
        Some(path) => read_prompt_file(path)
            .with_context(|| format!("Failed to load prompt template {}", path.display()))?,
        None => default_prompt.to_string(),
    };

    Ok(Agent::new(
        Box::new(provider),
        tools,
        &template,
        options.max_iterations,
    )?)
}
