use std::io::{self, Write};

use crate::outcome::{AgentOutcome, ReturnValues, OUTPUT_KEY};

/// What to show for an outcome
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// The answer text
    Output(String),
    /// Lines describing an outcome with no answer in it
    Diagnostic(Vec<String>),
}

pub fn render_outcome(outcome: &AgentOutcome) -> Rendered {
    match outcome {
        AgentOutcome::Finished(values) => render_values(values, "return_values"),
        AgentOutcome::Mapping(values) => render_values(values, "dict"),
        AgentOutcome::Text(text) => Rendered::Output(text.clone()),
        AgentOutcome::Unrecognized(type_name) => Rendered::Diagnostic(vec![format!(
            "Debug: Unexpected result type: {}",
            type_name
        )]),
    }
}

fn render_values(values: &ReturnValues, source: &str) -> Rendered {
    match values.get(OUTPUT_KEY) {
        Some(output) => Rendered::Output(crate::outcome::value_text(output)),
        None => {
            let keys: Vec<&str> = values.keys().map(String::as_str).collect();
            Rendered::Diagnostic(vec![
                format!("Debug: '{}' not in {}", OUTPUT_KEY, source),
                format!("Debug: {} keys: [{}]", source, keys.join(", ")),
            ])
        }
    }
}

/// Write the answer, or the diagnostic lines, one per line
pub fn print_outcome<W: Write>(outcome: &AgentOutcome, writer: &mut W) -> io::Result<()> {
    match render_outcome(outcome) {
        Rendered::Output(text) => writeln!(writer, "{}", text),
        Rendered::Diagnostic(lines) => {
            for line in lines {
                writeln!(writer, "{}", line)?;
            }
            Ok(())
        }
    }
}
