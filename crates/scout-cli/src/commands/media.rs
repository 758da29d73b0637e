use anyhow::Result;
use cliclack::{input, spinner};

use scout::config::{ConfigFromEnv, MediaConfig};
use scout::prompt_template::MEDIA_PROMPT;
use scout::tools::{http_client, media_tools};

use super::build_agent;
use crate::render::render;
use crate::RunOptions;

pub async fn execute(options: &RunOptions) -> Result<()> {
    let config = MediaConfig::from_env()?;
    let tools = media_tools(&http_client()?, &config);
    let agent = build_agent(options, tools, MEDIA_PROMPT)?;

    println!("Welcome to the Agentic GenAI system.");
    println!("You can ask complex questions, and the system will autonomously search for information from Wikipedia and Youtube.");

    let question: String = input("What would you like to know?")
        .placeholder("")
        .interact()?;

    let spin = spinner();
    spin.start("researching");
    let result = agent.run(&question).await;
    spin.stop("");

    render(&result?, options.plain)
}
