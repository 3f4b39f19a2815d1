use anyhow::Context;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf-cli", version, about = "Run and inspect the bookshelf service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API until Ctrl-C
    Serve {
        /// Insert this many generated books at startup
        #[arg(long)]
        seed: Option<u32>,
    },
    /// Print the resolved settings as JSON
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;

    match cli.command {
        Command::Serve { seed } => {
            if let Some(count) = seed {
                settings.store.seed_count = count;
            }
            bookshelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(
                env = ?settings.environment,
                seed = settings.store.seed_count,
                "bookshelf-cli serving"
            );
            bookshelf_app::run(settings).await
        }
        Command::Settings => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_accepts_seed() {
        let cli = Cli::try_parse_from(["bookshelf-cli", "serve", "--seed", "110"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { seed: Some(110) }));
    }

    #[test]
    fn test_seed_must_be_a_number() {
        assert!(Cli::try_parse_from(["bookshelf-cli", "serve", "--seed", "many"]).is_err());
    }
}
