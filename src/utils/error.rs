// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Malformed numeric fragment: '{0}'")]
    MalformedFragment(String), // Recovered locally by skipping the cell/token

    #[error("Invalid extractor configuration: {0}")]
    Config(String),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedExtension(String),

    #[error("{0} uploads need the extracted text (pass --extracted-text)")]
    MissingText(&'static str),
}

#[derive(Error, Debug)]
pub enum AnswerError {
    #[error("Answer backend unavailable: {0}")]
    Unavailable(String), // e.g. no API key configured

    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("Failed to parse backend response: {0}")]
    Parse(String),

    #[error("Backend returned no answer")]
    NoAnswer,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Document loading failed: {0}")]
    Document(#[from] DocumentError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Answering failed: {0}")]
    Answer(#[from] AnswerError),
}
