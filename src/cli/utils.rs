use serde::Serialize;

use crate::cli::OutputFormat;

/// Print `data` as pretty JSON, or hand it to `text` for the human-readable form.
pub fn output<T: Serialize>(
    output_format: OutputFormat,
    data: &T,
    text: impl FnOnce(&T) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
            Ok(())
        }
        OutputFormat::Text => text(data),
    }
}
