use serde::Serialize;
use tickerdash_core::{resolve, TimeRange, TimeWindow, UtcDateTime};

use crate::cli::WindowArgs;
use crate::error::CliError;

use super::CommandOutput;

#[derive(Debug, Serialize)]
struct WindowResponseData {
    range: TimeRange,
    window: TimeWindow,
    span_seconds: i64,
}

pub fn run(args: &WindowArgs) -> Result<CommandOutput, CliError> {
    let range = args.range.parse::<TimeRange>()?;
    let window = resolve(range, UtcDateTime::now());

    let data = serde_json::to_value(WindowResponseData {
        range,
        window,
        span_seconds: window.span().whole_seconds(),
    })?;
    Ok(CommandOutput::ok(data))
}
