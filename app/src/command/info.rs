use rollcall_config::Config;
use rollcall_store::StudentStore;
use tracing::info;

/// Strategy for displaying the effective configuration.
///
/// Secrets are masked. The database connection is tested as part of the
/// output.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== rollcall Configuration ===\n");

        println!("Server:");
        println!("  Listen: {}:{}", config.server.host, config.server.port);
        println!("  Client Origin: {}", config.server.client_origin);
        println!();

        println!("Provider:");
        println!("  Kind: {}", config.provider.kind);
        println!("  API Key: {}", mask_secret(&config.provider.api_key));
        println!(
            "  Model: {}",
            config.provider.model.as_deref().unwrap_or("(provider default)")
        );
        if let Some(url) = &config.provider.base_url {
            println!("  Base URL: {url}");
        }
        println!();

        println!("Database:");
        println!("  URL: {}", mask_database_url(&config.database.url));

        info!("Testing database connection");
        match StudentStore::connect(&config.database.url).await {
            Ok(store) => match store.ping().await {
                Ok(()) => println!("  Status: Connected"),
                Err(e) => {
                    println!("  Status: Ping failed");
                    println!("  Error: {e}");
                }
            },
            Err(e) => {
                println!("  Status: Connection failed");
                println!("  Error: {e}");
            }
        }

        Ok(())
    }
}

fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".to_string()
    } else if secret.len() > 8 && secret.is_ascii() {
        format!("{}...{}", &secret[..4], &secret[secret.len() - 4..])
    } else {
        "***".to_string()
    }
}

fn mask_database_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    let Some((credentials, after_at)) = rest.split_once('@') else {
        return url.to_string();
    };

    let Some((username, _password)) = credentials.split_once(':') else {
        return url.to_string();
    };

    format!("{scheme}://{username}:***@{after_at}")
}
