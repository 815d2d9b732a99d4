use serde_json::Value;

use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::error::CliError;

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(output)?
            } else {
                serde_json::to_string(output)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(output)?,
    }

    Ok(())
}

fn render_table(output: &CommandOutput) -> Result<(), CliError> {
    println!("data:");
    match &output.data {
        Value::Object(fields) => {
            for (name, value) in fields {
                match value {
                    Value::Array(items) => println!("  {name}: {} item(s)", items.len()),
                    Value::Object(_) => {
                        println!("  {name}:");
                        for line in serde_json::to_string_pretty(value)?.lines() {
                            println!("    {line}");
                        }
                    }
                    scalar => println!("  {name}: {scalar}"),
                }
            }
        }
        other => println!("  {other}"),
    }

    if !output.errors.is_empty() {
        println!("errors:");
        for error in &output.errors {
            match &error.symbol {
                Some(symbol) => println!("  - {symbol}: {}", error.message),
                None => println!("  - {}", error.message),
            }
        }
    }

    Ok(())
}
