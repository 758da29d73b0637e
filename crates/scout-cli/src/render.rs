use anyhow::{anyhow, Result};
use bat::{PrettyPrinter, WrappingMode};
use std::io;

use scout::outcome::AgentOutcome;
use scout::printer::{print_outcome, render_outcome, Rendered};

/// Show an agent outcome: markdown for answers, plain lines for diagnostics
pub fn render(outcome: &AgentOutcome, plain: bool) -> Result<()> {
    if plain {
        return Ok(print_outcome(outcome, &mut io::stdout().lock())?);
    }

    match render_outcome(outcome) {
        Rendered::Output(text) => print_markdown(&text),
        Rendered::Diagnostic(lines) => {
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

fn print_markdown(content: &str) -> Result<()> {
    PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print()
        .map_err(|e| anyhow!("Failed to render answer: {}", e))?;
    println!();
    Ok(())
}
