use anyhow::Result;
use cliclack::{input, spinner};
use console::style;

use scout::config::{ConfigFromEnv, ServiceConfig};
use scout::prompt_template::SERVICE_PROMPT;
use scout::tools::{http_client, service_tools};

use super::build_agent;
use crate::render::render;
use crate::RunOptions;

/// Only the literal word ends the session; anything else is a question
fn is_exit(query: &str) -> bool {
    query == "exit"
}

pub async fn execute(options: &RunOptions) -> Result<()> {
    let config = ServiceConfig::from_env()?;
    let tools = service_tools(&http_client()?, &config);
    let agent = build_agent(options, tools, SERVICE_PROMPT)?;

    println!(
        "Service desk agent {}",
        style("- type \"exit\" to end the session").dim()
    );

    loop {
        let query: String = match input("Enter your query").placeholder("").interact() {
            Ok(query) => query,
            // Ctrl-C / Ctrl-D at the prompt
            Err(_) => break,
        };

        if is_exit(&query) {
            break;
        }

        let spin = spinner();
        spin.start("awaiting reply");
        let result = agent.run(&query).await;
        spin.stop("");

        render(&result?, options.plain)?;
        println!();
    }
    Ok(())
}
