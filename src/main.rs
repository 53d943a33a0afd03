use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use widget_loader::config::AppConfig;
use widget_loader::embed::EmbedSnippet;
use widget_loader::server::{self, AppState};
use widget_loader::widget::WidgetConfig;

#[derive(Debug, Parser)]
#[command(name = "widget-loader", version, about = "Chat widget loader host")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the loader script, wasm package, embed and preview APIs.
    Serve {
        #[arg(long)]
        bind: Option<SocketAddr>,
        #[arg(long)]
        assets: Option<PathBuf>,
    },
    /// Print the embed code for a bot.
    Snippet {
        #[arg(long)]
        bot_id: String,
        #[arg(long)]
        api_key: String,
        #[arg(long)]
        api_url: Option<String>,
        /// Loader script url; defaults to PUBLIC_URL + /widget/loader.js.
        #[arg(long)]
        loader_src: Option<String>,
        /// Print the attribute-configured script tag instead of the init call.
        #[arg(long)]
        declarative: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;

    match cli.command.unwrap_or(Command::Serve {
        bind: None,
        assets: None,
    }) {
        Command::Serve { bind, assets } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(assets) = assets {
                config.assets_dir = assets;
            }
            let addr = config.bind_addr;
            tracing::info!(%addr, assets = %config.assets_dir.display(), "starting widget-loader server");
            server::run(addr, AppState::new(config)).await?;
        }
        Command::Snippet {
            bot_id,
            api_key,
            api_url,
            loader_src,
            declarative,
        } => {
            let widget = WidgetConfig {
                bot_id,
                api_key,
                api_url,
                element_id: None,
            };
            let src = loader_src.unwrap_or_else(|| config.loader_src());
            let snippet = EmbedSnippet::for_config(&src, &widget)?;
            if declarative {
                println!("{}", snippet.declarative);
            } else {
                println!("{}", snippet.programmatic);
            }
        }
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
