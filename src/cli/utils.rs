use serde::Serialize;

use crate::cli::OutputFormat;

/// Prints `value` as pretty JSON, or `text` in text mode.
pub fn output<T: Serialize>(output_format: OutputFormat, value: &T, text: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", text),
    }
    Ok(())
}
