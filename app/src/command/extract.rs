use rollcall_config::Config;
use tracing::error;

/// Input parameters for the Extract command strategy.
#[derive(Debug, Clone)]
pub struct ExtractInput {
    /// Utterance transcript to extract from
    pub text: String,
    /// Optional model override
    pub model: Option<String>,
}

/// Strategy for running the AI extraction pipeline once from the terminal.
///
/// The transcript is taken as given; no speech capture happens here. The
/// stored record is printed as JSON.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let intake = super::build_intake(&config).await?;
        let intake = match input.model {
            Some(model) => intake.with_model(model),
            None => intake,
        };

        match intake.extract(&input.text).await {
            Ok(record) => {
                println!("{}", serde_json::to_string_pretty(&record)?);
                Ok(())
            }
            Err(e) => {
                error!("Extraction failed: {e:?}");
                anyhow::bail!("{e}")
            }
        }
    }
}
