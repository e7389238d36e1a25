use serde::Serialize;

use super::contract::ContractArgs;
use crate::cli::utils::output;
use crate::cli::OutputFormat;
use crate::contract::ContractDocument;
use crate::version::ApiVersion;

#[derive(Debug, Serialize)]
pub struct RouteRow {
    pub method: String,
    pub path: String,
    pub operation_id: Option<String>,
}

/// One row per operation per version, in mount order.
pub fn route_rows(document: &ContractDocument) -> Vec<RouteRow> {
    ApiVersion::ALL
        .iter()
        .flat_map(|version| {
            document.operations().iter().map(move |op| RouteRow {
                method: op.method.to_string(),
                path: format!("{}{}", version.prefix(), op.template.as_str()),
                operation_id: op.operation_id.clone(),
            })
        })
        .collect()
}

pub fn handle(args: ContractArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let document = args.load()?;
    let rows = route_rows(&document);

    output(output_format, &rows, |rows| {
        for row in rows {
            println!(
                "{:<7} {:<22} {}",
                row.method,
                row.path,
                row.operation_id.as_deref().unwrap_or("-")
            );
        }
        Ok(())
    })
}
