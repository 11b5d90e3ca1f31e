//! Operator console for the site content.
//!
//! # Responsibility
//! - Expose view/edit/share/export/reset/suggest over `gemsite_core`.
//! - Print failures to stderr and exit non-zero; never panic.

use clap::{Parser, Subcommand};
use gemsite_core::config::{database_path, log_dir, SiteConfig};
use gemsite_core::export::csv::{write_itinerary_csv, DEFAULT_EXPORT_FILE_NAME};
use gemsite_core::model::media::image_file_data_uri;
use gemsite_core::suggest::{DEFAULT_GUEST_COUNT, EVENT_KINDS};
use gemsite_core::{
    default_data_dir, init_logging, open_db, ContentValue, GeminiClient, ResetConfirmation,
    SaveStatus, SiteSession, SqliteContentRepository, SuggestionOutcome, SuggestionService,
};
use log::info;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const RESET_PROMPT: &str =
    "Are you sure you want to reset all changes to factory defaults? This cannot be undone.";

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "gemsite", version, about = "GEM Events site content console")]
struct Cli {
    /// Directory holding config, database and logs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Overrides the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Share link whose content takes precedence at startup
    #[arg(long, global = true)]
    link: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the site content
    Show {
        /// List every editable field with its path
        #[arg(long)]
        admin: bool,
    },
    /// Print the value at a dotted path
    Get { path: String },
    /// Set the text at a dotted path
    Set { path: String, value: String },
    /// Embed an image file at a dotted path
    SetImage { path: String, file: PathBuf },
    /// Print a share link for the current content
    Share {
        #[arg(long)]
        page_url: Option<String>,
    },
    /// Write the itinerary items as CSV
    ExportCsv {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Clear saved content and restore factory defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Ask the AI planner for an itinerary
    Suggest {
        #[arg(long, default_value = "Wedding")]
        kind: String,
        #[arg(long, default_value_t = DEFAULT_GUEST_COUNT)]
        guests: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    let data_dir = if data_dir.is_absolute() {
        data_dir
    } else {
        std::env::current_dir()?.join(data_dir)
    };
    std::fs::create_dir_all(&data_dir)?;
    let config = SiteConfig::load_from_dir(&data_dir);
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    if let Err(err) = init_logging(level, &log_dir(&data_dir)) {
        eprintln!("warning: logging disabled: {err}");
    }

    let conn = open_db(database_path(&data_dir))?;
    let repo = SqliteContentRepository::try_new(&conn)?.with_quota(config.storage_quota_bytes);
    let (mut session, report) = SiteSession::bootstrap(repo, cli.link.as_deref());
    info!(
        "event=cli_start module=cli status=ok source={}",
        report.source.as_str()
    );
    if let Some(err) = &report.link_error {
        eprintln!("warning: share link ignored: {err}");
    }
    if let Some(err) = &report.storage_error {
        eprintln!("warning: saved content unreadable, using defaults: {err}");
    }
    warn_if_unsaved(&report.save_status);

    match cli.command {
        Command::Show { admin } => {
            session.set_admin_mode(admin);
            show(&session)
        }
        Command::Get { path } => {
            let value = session
                .document()
                .get(&path)
                .ok_or_else(|| format!("nothing at `{path}`"))?;
            match value {
                ContentValue::Text(text) => println!("{text}"),
                other => println!("{}", serde_json::to_string_pretty(other)?),
            }
            Ok(())
        }
        Command::Set { path, value } => {
            warn_if_unsaved(&session.apply_edit(&path, value)?);
            println!("updated {path}");
            Ok(())
        }
        Command::SetImage { path, file } => {
            let uri = image_file_data_uri(&file)?;
            warn_if_unsaved(&session.apply_edit(&path, uri)?);
            println!("embedded {} at {path}", file.display());
            Ok(())
        }
        Command::Share { page_url } => {
            let page_url = page_url.unwrap_or(config.page_url);
            println!("{}", session.share_link(&page_url, config.share_url_limit)?);
            Ok(())
        }
        Command::ExportCsv { output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE_NAME));
            let bytes = write_itinerary_csv(session.document(), &output)?;
            println!("wrote {bytes} bytes to {}", output.display());
            Ok(())
        }
        Command::Reset { yes } => {
            let answer = if yes { "yes".to_string() } else { ask(RESET_PROMPT)? };
            let Some(confirmation) = ResetConfirmation::from_operator_answer(&answer) else {
                println!("reset cancelled");
                return Ok(());
            };
            session.factory_reset(confirmation)?;
            println!("content restored to factory defaults");
            Ok(())
        }
        Command::Suggest { kind, guests } => {
            if !EVENT_KINDS.contains(&kind.as_str()) {
                eprintln!("note: `{kind}` is not one of {}", EVENT_KINDS.join(", "));
            }
            let client = GeminiClient::from_env()
                .with_endpoint(config.ai.endpoint)
                .with_model(config.ai.model)
                .with_timeout_secs(config.ai.timeout_secs);
            if !client.has_credential() {
                eprintln!("note: GEMINI_API_KEY is not set");
            }
            match SuggestionService::new(client).request(&kind, guests) {
                SuggestionOutcome::Ready(suggestion) => {
                    println!("{} at {}", suggestion.theme_name, suggestion.venue);
                    for step in &suggestion.itinerary {
                        println!("  {}  {}: {}", step.time, step.activity, step.description);
                    }
                }
                SuggestionOutcome::Empty => println!("no suggestion available"),
                SuggestionOutcome::Busy => println!("a suggestion is already being prepared"),
            }
            Ok(())
        }
    }
}

fn show<R: gemsite_core::ContentRepository>(session: &SiteSession<R>) -> CliResult<()> {
    if session.is_admin_mode() {
        for (field, value) in session.editable_fields()? {
            println!("{} = {value}", field.path());
        }
        return Ok(());
    }

    let content = session.site_content()?;
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    println!("{} | {}", text(&content.brand.name), text(&content.brand.tagline));
    println!();
    println!("{}", text(&content.hero.title));
    println!("{}", text(&content.hero.subtitle));
    println!();
    println!("{}", text(&content.philosophy.title));
    for card in &content.philosophy.cards {
        println!("  {} {}", text(&card.id), text(&card.title));
    }
    println!();
    println!("{}", text(&content.sticky_section.title));
    for item in &content.sticky_section.items {
        println!("  {} ({})", text(&item.title), text(&item.location));
    }
    println!();
    println!("{}", text(&content.booking.title));
    Ok(())
}

fn warn_if_unsaved(status: &SaveStatus) {
    if let SaveStatus::Unsaved(err) = status {
        eprintln!("warning: changes kept in memory only: {err}");
    }
}

fn ask(prompt: &str) -> io::Result<String> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer)
}
