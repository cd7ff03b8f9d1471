//! CLI for cardgen - greeting-card builder.

use cardgen::image::ImageReference;
use cardgen::service::BASE_URL_ENV;
use cardgen::{CardBuilder, HttpCardService, SessionCommand, TerminalView};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cardgen")]
#[command(about = "Build greeting cards: generate a background, add a message, save the card")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Card backend base URL
    #[arg(long, global = true, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a background and write a message onto it in one go
    Make(MakeArgs),

    /// Generate a background only
    Background(BackgroundArgs),

    /// Interactive session reading commands from stdin
    Session(SessionArgs),
}

#[derive(Args)]
struct MakeArgs {
    /// Description of the card background
    #[arg(short, long)]
    prompt: String,

    /// Message written onto the card
    #[arg(short, long)]
    message: String,

    /// Directory the finished card is saved into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args)]
struct BackgroundArgs {
    /// Description of the card background
    prompt: String,

    /// Save the background to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct SessionArgs {
    /// Directory saved cards go into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cardgen=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut service = HttpCardService::builder();
    if let Some(url) = cli.base_url {
        service = service.base_url(url);
    }
    let service = service.build()?;

    match cli.command {
        Commands::Make(args) => make_card(service, args, cli.json).await?,
        Commands::Background(args) => generate_background(service, args, cli.json).await?,
        Commands::Session(args) => run_session(service, args).await?,
    }

    Ok(())
}

async fn make_card(
    service: HttpCardService,
    args: MakeArgs,
    json_output: bool,
) -> anyhow::Result<()> {
    let view = TerminalView::new(&args.out_dir).quiet(json_output);
    let mut builder = CardBuilder::new(service, view);

    // Failures were already shown as notices; the error only sets the exit code.
    builder.request_background(&args.prompt).await?;
    builder.request_card_assembly(&args.message).await?;
    builder.download_card()?;

    let saved = builder
        .view()
        .saved()
        .last()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    if json_output {
        let result = serde_json::json!({
            "type": "card",
            "success": true,
            "output": saved,
            "backend": builder.service().base_url(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Card saved: {saved}");
    }

    Ok(())
}

async fn generate_background(
    service: HttpCardService,
    args: BackgroundArgs,
    json_output: bool,
) -> anyhow::Result<()> {
    let view = TerminalView::new(".").quiet(json_output);
    let mut builder = CardBuilder::new(service, view);

    let reference = builder.request_background(&args.prompt).await?;
    let image = ImageReference::parse(&reference)?;

    if let Some(ref output) = args.output {
        image.save(output)?;
    }

    if json_output {
        // Inline data URLs are too large to echo back.
        let remote = (!image.is_inline()).then_some(&reference);
        let result = serde_json::json!({
            "type": "background",
            "success": true,
            "inline": image.is_inline(),
            "reference": remote,
            "output": args.output.as_ref().map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Background: {}", image.describe());
        if let Some(output) = args.output {
            println!("Saved to {}", output.display());
        }
    }

    Ok(())
}

async fn run_session(service: HttpCardService, args: SessionArgs) -> anyhow::Result<()> {
    let mut builder = CardBuilder::new(service, TerminalView::new(&args.out_dir));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("🎄 cardgen session ({})", builder.service().base_url());
    eprintln!("{}", SessionCommand::HELP);

    while let Some(line) = lines.next_line().await? {
        // Errors are shown by the view; the session carries on.
        match SessionCommand::parse(&line) {
            SessionCommand::Background(prompt) => {
                let _ = builder.request_background(&prompt).await;
            }
            SessionCommand::Card(message) => {
                let _ = builder.request_card_assembly(&message).await;
            }
            SessionCommand::Save => {
                let _ = builder.download_card();
            }
            SessionCommand::Status => {
                let view = builder.view();
                eprintln!(
                    "background: {}\ncard: {}\ncreate enabled: {}",
                    describe(builder.background()),
                    describe(builder.card()),
                    view.create_enabled()
                );
            }
            SessionCommand::Help => eprintln!("{}", SessionCommand::HELP),
            SessionCommand::Quit => break,
            SessionCommand::Empty => {}
            SessionCommand::Unknown(word) => {
                eprintln!("unknown command {word:?}; type 'help'");
            }
        }
    }

    Ok(())
}

fn describe(reference: Option<&str>) -> String {
    match reference {
        Some(r) => ImageReference::parse(r)
            .map(|i| i.describe())
            .unwrap_or_else(|_| r.to_string()),
        None => "none".into(),
    }
}
