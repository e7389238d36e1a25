use std::path::PathBuf;

use clap::Args;

use crate::config::AppConfig;

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Interface to bind (default 0.0.0.0)")]
    pub host: Option<String>,

    #[arg(long, short, help = "Port to listen on (default 3000)")]
    pub port: Option<u16>,

    #[arg(long, help = "OpenAPI document to serve instead of the embedded one")]
    pub contract: Option<PathBuf>,

    #[arg(long, help = "Skip validation of outgoing responses")]
    pub no_response_validation: bool,
}

impl ServeArgs {
    /// Flags win over environment configuration.
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(contract) = self.contract {
            config.contract.path = Some(contract);
        }
        if self.no_response_validation {
            config.validation.validate_responses = false;
        }
    }
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = crate::config::config().clone();
    args.apply(&mut config);

    tracing::info!("Starting Storefront API in {:?} mode", config.environment);
    crate::server::serve(&config).await
}
