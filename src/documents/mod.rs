// src/documents/mod.rs
use crate::extractors::Table;
use crate::utils::error::DocumentError;
use std::fs;
use std::path::Path;

// --- Constants ---
pub const DEFAULT_PROMPT_CHAR_LIMIT: usize = 12_000;
// Rows of a spreadsheet included in the prompt summary.
const PROMPT_SAMPLE_ROWS: usize = 10;

const SPREADSHEET_EXTENSIONS: [&str; 1] = ["csv"];
const PDF_EXTENSIONS: [&str; 1] = ["pdf"];
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// An uploaded document, resolved once from its file type.
///
/// PDF and image text comes from an upstream extractor (PDF text dump or OCR);
/// this crate only consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Spreadsheet(Table),
    Pdf(String),
    Image(String),
}

impl Document {
    /// Resolves an upload by extension and loads its content.
    ///
    /// `extracted_text` is the upstream extractor's output for PDF and image uploads
    /// and is ignored for spreadsheets.
    pub fn resolve(path: &Path, extracted_text: Option<&Path>) -> Result<Self, DocumentError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
            tracing::info!("Loading spreadsheet: {}", path.display());
            return Ok(Document::Spreadsheet(read_csv_table(fs::read_to_string(path)?.as_str())?));
        }

        let kind = if PDF_EXTENSIONS.contains(&extension.as_str()) {
            "PDF"
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            "Image"
        } else {
            return Err(DocumentError::UnsupportedExtension(path.display().to_string()));
        };

        let text_path = extracted_text.ok_or(DocumentError::MissingText(kind))?;
        tracing::info!("Loading extracted text for {} upload from {}", kind, text_path.display());
        let text = fs::read_to_string(text_path)?;
        Ok(if kind == "PDF" { Document::Pdf(text) } else { Document::Image(text) })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Document::Spreadsheet(_) => "spreadsheet",
            Document::Pdf(_) => "pdf",
            Document::Image(_) => "image",
        }
    }

    /// The document as prompt context: a JSON summary for tables, the
    /// whitespace-collapsed text otherwise. Cut to `limit` characters.
    pub fn content_for_prompt(&self, limit: usize) -> String {
        let content = match self {
            Document::Spreadsheet(table) => serde_json::json!({
                "tipo_conteudo": self.kind(),
                "colunas": table.columns(),
                "amostra": table.head_records(PROMPT_SAMPLE_ROWS),
            })
            .to_string(),
            Document::Pdf(text) | Document::Image(text) => {
                text.split_whitespace().collect::<Vec<_>>().join(" ")
            }
        };
        limit_chars(&content, limit)
    }
}

/// Parses CSV content with a header row into a `Table`.
pub fn read_csv_table(content: &str) -> Result<Table, DocumentError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| r.map(|record| record.iter().map(str::to_string).collect::<Vec<_>>()))
        .collect::<Result<Vec<_>, csv::Error>>()?;

    tracing::debug!("Parsed table with {} columns and {} rows", columns.len(), rows.len());
    Ok(Table::new(columns, rows))
}

fn limit_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
