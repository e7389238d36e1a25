use std::path::PathBuf;

use clap::Args;

use crate::cli::utils::output;
use crate::cli::OutputFormat;
use crate::contract::ContractDocument;

#[derive(Debug, Default, Args)]
pub struct ContractArgs {
    #[arg(long, help = "Read the contract from this file instead of the embedded one")]
    pub contract: Option<PathBuf>,
}

impl ContractArgs {
    /// Flag, then `STOREFRONT_CONTRACT_PATH`, then the embedded document.
    pub fn load(self) -> anyhow::Result<ContractDocument> {
        let path = self
            .contract
            .or_else(|| crate::config::config().contract.path.clone());
        Ok(ContractDocument::load(path.as_deref())?)
    }
}

pub fn handle(args: ContractArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let document = args.load()?;
    output(output_format, document.raw(), |raw| {
        print!("{}", serde_yaml::to_string(raw)?);
        Ok(())
    })
}
