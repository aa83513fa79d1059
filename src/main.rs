// src/main.rs
mod answer;
mod documents;
mod extractors;
mod history;
mod utils;

use answer::{Answerer, ChatAnswerer, ChatSettings, FallbackAnswerer, HeuristicAnswerer};
use clap::{Parser, ValueEnum};
use documents::{Document, DEFAULT_PROMPT_CHAR_LIMIT};
use extractors::config::{DEFAULT_COLUMN_THRESHOLD, DEFAULT_LINE_THRESHOLD, DEFAULT_WINDOW_RADIUS};
use extractors::{DedupPolicy, ExtractorConfig, ValueExtractor};
use history::{Session, DEFAULT_HISTORY_CAPACITY};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use utils::AppError;

/// How questions are answered.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Ask the chat-completion backend, falling back to the value extractor
    Ask,
    /// Treat each question as an item name and list the monetary values next to it
    Values,
}

/// Ask questions about an uploaded spreadsheet, PDF or image
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Uploaded document (.csv, .pdf or an image)
    #[arg(short, long)]
    file: PathBuf,

    /// Text produced by the upstream PDF/OCR extractor for this upload
    #[arg(short, long)]
    extracted_text: Option<PathBuf>,

    /// Answer a single question and exit (otherwise questions are read from stdin)
    #[arg(short, long)]
    question: Option<String>,

    /// Answering mode
    #[arg(short, long, value_enum, default_value_t = Mode::Ask)]
    mode: Mode,

    /// Number of recent question/answer pairs kept in the session history
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_size: usize,

    /// API key for the chat-completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat model ID
    #[arg(long, env = "OPENAI_MODEL", default_value = answer::chat::DEFAULT_MODEL)]
    model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = answer::chat::DEFAULT_BASE_URL)]
    base_url: String,

    /// Max attempts per chat request
    #[arg(long, default_value_t = 3)]
    max_retries: usize,

    /// Minimum partial-ratio score (0-100) for a line or token window to match
    #[arg(long, default_value_t = DEFAULT_LINE_THRESHOLD)]
    line_threshold: u8,

    /// Minimum partial-ratio score (0-100) for a column name to match
    #[arg(long, default_value_t = DEFAULT_COLUMN_THRESHOLD)]
    column_threshold: u8,

    /// Tokens kept on each side of a match in single-line text
    #[arg(long, default_value_t = DEFAULT_WINDOW_RADIUS)]
    window_radius: usize,

    /// Duplicate suppression: consecutive, global or keep
    #[arg(long, default_value = "consecutive")]
    dedup: DedupPolicy,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting with file {} in {:?} mode", args.file.display(), args.mode);

    if args.history_size == 0 {
        return Err(AppError::Config("--history-size must be at least 1".to_string()));
    }

    // 3. Build the extractor
    let extractor = ValueExtractor::with_config(ExtractorConfig {
        line_threshold: args.line_threshold,
        column_threshold: args.column_threshold,
        window_radius: args.window_radius,
        dedup: args.dedup,
    })?;
    tracing::debug!("Extractor config: {:?}", extractor.config());

    // 4. Resolve the upload once
    let document = Document::resolve(&args.file, args.extracted_text.as_deref())?;
    tracing::info!("Loaded {} document", document.kind());

    // 5. Pick the answering strategy
    let heuristic = HeuristicAnswerer::new(extractor);
    let lister = heuristic.clone();
    let answerer: Box<dyn Answerer> = match args.mode {
        Mode::Values => Box::new(heuristic),
        Mode::Ask => {
            let chat = ChatAnswerer::new(ChatSettings {
                api_key: args.api_key.clone(),
                base_url: args.base_url.clone(),
                model: args.model.clone(),
                max_retries: args.max_retries,
                prompt_char_limit: DEFAULT_PROMPT_CHAR_LIMIT,
            })?;
            Box::new(FallbackAnswerer::new(chat, heuristic))
        }
    };

    // 6. Single question
    if let Some(question) = &args.question {
        let answer = answerer.answer(&document, question).await?;
        println!("{}", answer);
        return Ok(());
    }

    // 7. Interactive session
    let mut session = Session::new(args.history_size);
    tracing::info!("Type a question, ':values' to list every amount, ':history' to list recent answers, ':clear' to forget them, ':quit' to exit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => continue,
            ":quit" | ":q" => break,
            ":values" => println!("{}\n", lister.all_values(&document)),
            ":history" => match session.render_history() {
                Some(rendered) => println!("{}\n", rendered),
                None => println!("History is empty.\n"),
            },
            ":clear" => {
                session.clear_history();
                println!("History cleared.\n");
            }
            question => match answerer.answer(&document, question).await {
                Ok(answer) => {
                    println!("{}\n", answer);
                    session.record(question, &answer);
                }
                Err(e) => tracing::error!("Failed to answer '{}': {}", question, e),
            },
        }
    }

    tracing::info!(
        "Session finished with {}/{} entries in history",
        session.history().len(),
        session.history().capacity()
    );
    Ok(())
}
