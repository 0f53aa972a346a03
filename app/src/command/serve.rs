use rollcall_config::Config;
use rollcall_server::RollcallServer;

/// Input parameters for the Serve command strategy.
#[derive(Debug, Clone, Default)]
pub struct ServeInput {
    /// Listen address override
    pub host: Option<String>,
    /// Listen port override
    pub port: Option<u16>,
}

/// Strategy for running the HTTP API.
///
/// Loads configuration, connects the store and provider, then serves
/// until interrupted.
#[derive(Debug, Clone, Copy)]
pub struct ServeStrategy;

impl super::CommandStrategy for ServeStrategy {
    type Input = ServeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(host) = input.host {
            config.server.host = host;
        }
        if let Some(port) = input.port {
            config.server.port = port;
        }

        let intake = super::build_intake(&config).await?;
        RollcallServer::new(config.server, intake).serve().await
    }
}
