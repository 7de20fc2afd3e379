use anyhow::{Context, Result};
use artisanpost::config::Config;
use artisanpost::feeds::generator::GenerationClient;
use artisanpost::feeds::upload::UploadClient;
use artisanpost::post::{Platform, PostDraft};
use artisanpost::share::ShareDispatcher;
use artisanpost::{app, commands, logging};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "artisanpost")]
#[command(about = "Terminal storefront for artisans with AI-generated social posts")]
#[command(version)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the post generator endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Override the recording upload endpoint
    #[arg(long)]
    upload_endpoint: Option<String>,

    /// Override the landing content source (file path or URL)
    #[arg(long)]
    content: Option<String>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a single post and print it with its share link
    Generate {
        #[arg(short, long, value_enum, default_value_t = Platform::Instagram)]
        platform: Platform,

        /// Description of the craft to post about
        text: String,

        /// Also open the share link
        #[arg(long)]
        open: bool,
    },
    /// Upload an interview recording and save the landing content built from it
    Upload {
        /// Audio file (wav, mp3, ...)
        audio: PathBuf,

        /// Where to save the content document
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Write the default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut stdout = std::io::stdout();

    // Runs before any config is read so a missing or broken file can be (re)written
    if let Some(Command::InitConfig { force }) = args.command {
        let path = match args.config {
            Some(path) => path,
            None => Config::default_path().context("Could not determine config directory")?,
        };
        return commands::init_config(&path, force, &mut stdout);
    }

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        config.generator.endpoint = endpoint;
    }
    if let Some(endpoint) = args.upload_endpoint {
        config.upload.endpoint = endpoint;
    }
    if let Some(content) = args.content {
        config.content.source = Some(content);
    }

    match args.command {
        None => {
            logging::init_file(args.log_dir);
            tracing::info!(endpoint = %config.generator.endpoint, "starting dashboard");
            app::run_tui(config).await
        }
        Some(Command::Generate {
            platform,
            text,
            open,
        }) => {
            logging::init_stderr();
            let client = GenerationClient::new(&config.generator)?;
            let dispatcher = ShareDispatcher::system(config.share);
            commands::generate_post(
                &client,
                &dispatcher,
                PostDraft::new(text, platform),
                open,
                &mut stdout,
            )
            .await
        }
        Some(Command::Upload { audio, save }) => {
            logging::init_stderr();
            let save_to = match save {
                Some(path) => path,
                None => Config::default_content_path()
                    .context("Could not determine data directory")?,
            };
            let client = UploadClient::new(&config.upload)?;
            commands::upload_recording(&client, &audio, &save_to, &mut stdout).await
        }
        Some(Command::InitConfig { .. }) => unreachable!("handled before loading config"),
    }
}
