use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wl_sorter::commands;
use wl_sorter::commands::init::InitArgs;
use wl_sorter::config::{default_page_size, load_env};
use wl_sorter::listing::SortOrder;

#[derive(Parser)]
#[command(name = "wl-sorter")]
#[command(about = "Sort a YouTube playlist or a pasted list of videos by duration")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the OAuth client used to sign in
    Init {
        /// OAuth client ID
        #[arg(long)]
        client_id: Option<String>,

        /// OAuth client secret
        #[arg(long)]
        client_secret: Option<String>,

        /// Redirect URI registered for the client (default: http://localhost:8501)
        #[arg(long)]
        redirect_uri: Option<String>,

        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Sign in and browse your videos
    Session {
        /// Videos per page (10, 20, 50 or 100)
        #[arg(short = 'n', long)]
        page_size: Option<usize>,

        /// Initial sort order
        #[arg(short, long, value_enum, default_value_t = SortOrder::Shortest)]
        order: SortOrder,
    },
}

#[tokio::main]
async fn main() {
    // Load environment variables
    load_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            client_id,
            client_secret,
            redirect_uri,
            force,
        } => commands::init::run(InitArgs {
            client_id,
            client_secret,
            redirect_uri,
            force,
        }),
        Commands::Session { page_size, order } => {
            let page_size = page_size.unwrap_or_else(|| default_page_size().get());
            commands::session::run(page_size, order).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
