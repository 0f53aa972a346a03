//! Static strategy pattern for CLI commands.
//!
//! Each subcommand is a separate strategy type with its own input, so
//! dispatch in `main` is monomorphized.

use rollcall_config::{Config, ProviderConfig, ProviderKind};
use rollcall_core::{LLMProvider, StudentIntake};
use rollcall_providers::{GeminiProvider, ZhipuProvider};
use rollcall_store::StudentStore;
use tracing::info;

mod extract;
mod info;
mod init;
mod serve;
mod version;

pub use extract::{ExtractInput, ExtractStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use serve::{ServeInput, ServeStrategy};
pub use version::VersionStrategy;

/// The intake service as wired by the CLI: provider chosen at runtime,
/// records stored through sea-orm.
pub type Intake = StudentIntake<Box<dyn LLMProvider>, StudentStore>;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

fn build_provider(config: &ProviderConfig) -> anyhow::Result<Box<dyn LLMProvider>> {
    if config.api_key.is_empty() {
        anyhow::bail!(
            "No API key configured. Set provider.api_key in the config file or export {}.",
            match config.kind {
                ProviderKind::Gemini => "GEMINI_API_KEY",
                ProviderKind::Zhipu => "ZHIPU_API_KEY",
            }
        );
    }

    let key = config.api_key.clone();
    let provider: Box<dyn LLMProvider> = match (config.kind, config.base_url.clone()) {
        (ProviderKind::Gemini, None) => Box::new(GeminiProvider::new(key)),
        (ProviderKind::Gemini, Some(url)) => Box::new(GeminiProvider::new(key).with_base_url(url)),
        (ProviderKind::Zhipu, None) => Box::new(ZhipuProvider::new(key)),
        (ProviderKind::Zhipu, Some(url)) => Box::new(ZhipuProvider::new(key).with_base_url(url)),
    };
    Ok(provider)
}

/// Connect the store and provider described by `config`.
async fn build_intake(config: &Config) -> anyhow::Result<Intake> {
    let provider = build_provider(&config.provider)?;
    let store = StudentStore::connect(&config.database.url).await?;

    let intake = StudentIntake::new(provider, store);
    let intake = match &config.provider.model {
        Some(model) => intake.with_model(model.clone()),
        None => intake,
    };
    info!(
        "Using {} provider, model {}",
        config.provider.kind,
        intake.model()
    );
    Ok(intake)
}
