// src/answer/heuristic.rs
use crate::answer::Answerer;
use crate::documents::Document;
use crate::extractors::{Lookup, ValueExtractor};
use crate::utils::error::AnswerError;
use async_trait::async_trait;
use std::fmt::Display;

/// Shown when the query matched no column or line.
pub const NOT_FOUND_MESSAGE: &str = "Item not found in the document.";
/// Shown when the query matched but no monetary value sits there.
pub const NO_VALUES_MESSAGE: &str = "Item found, but no monetary values were found next to it.";
/// Shown when the whole document holds no monetary value.
pub const EMPTY_DOCUMENT_MESSAGE: &str = "No monetary values found in the document.";

/// Local answer backend: the regex/fuzzy value extractor.
#[derive(Debug, Clone, Default)]
pub struct HeuristicAnswerer {
    extractor: ValueExtractor,
}

impl HeuristicAnswerer {
    pub fn new(extractor: ValueExtractor) -> Self {
        Self { extractor }
    }

    /// Runs the lookup matching the document type and renders it.
    pub fn lookup(&self, document: &Document, item: &str) -> String {
        match document {
            Document::Spreadsheet(table) => render(self.extractor.find_column_values(table, item)),
            Document::Pdf(text) | Document::Image(text) => {
                render(self.extractor.find_values_near(text, item))
            }
        }
    }

    /// Every monetary value in the document, ignoring any query. Spreadsheets are
    /// flattened row by row, so only cells already in currency form are picked up.
    pub fn all_values(&self, document: &Document) -> String {
        let text = match document {
            Document::Spreadsheet(table) => table
                .rows()
                .iter()
                .map(|row| row.join(" "))
                .collect::<Vec<_>>()
                .join("\n"),
            Document::Pdf(text) | Document::Image(text) => text.clone(),
        };
        let values = self.extractor.find_values(&text);
        if values.is_empty() {
            return EMPTY_DOCUMENT_MESSAGE.to_string();
        }
        render(Lookup::Found(values))
    }
}

/// One value per line, or one of the two stable messages.
pub fn render<T: Display>(lookup: Lookup<T>) -> String {
    match lookup {
        Lookup::NotFound => NOT_FOUND_MESSAGE.to_string(),
        Lookup::Found(values) if values.is_empty() => NO_VALUES_MESSAGE.to_string(),
        Lookup::Found(values) => values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

#[async_trait]
impl Answerer for HeuristicAnswerer {
    fn name(&self) -> &'static str {
        "value extractor"
    }

    async fn answer(&self, document: &Document, question: &str) -> Result<String, AnswerError> {
        Ok(self.lookup(document, question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::read_csv_table;
    use tokio_test::block_on;

    #[test]
    fn test_text_document_lookup() {
        let answerer = HeuristicAnswerer::default();
        let doc = Document::Image("Frango inteiro R$ 8,99 Peito de frango R$ 12,50".to_string());
        assert_eq!(answerer.lookup(&doc, "frango"), "R$ 8,99\nR$ 12,50");
        assert_eq!(answerer.lookup(&doc, "picanha"), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_spreadsheet_lookup() {
        let answerer = HeuristicAnswerer::default();
        let table = read_csv_table("Estado,Produto,Valor Unit\nSP,Arroz,21.90\nMG,Arroz,19\n").unwrap();
        let doc = Document::Spreadsheet(table);
        assert_eq!(answerer.lookup(&doc, "valor"), "SP: R$ 21,90\nMG: R$ 19,00");
        assert_eq!(answerer.lookup(&doc, "xyz123"), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_all_values() {
        let answerer = HeuristicAnswerer::default();
        let doc = Document::Pdf("Arroz R$ 21,90\nFeijão R$ 7,49\nsem preço".to_string());
        assert_eq!(answerer.all_values(&doc), "R$ 21,90\nR$ 7,49");

        let table = read_csv_table("Produto,Preço\nCafé,\"R$ 15,00\"\nLeite,4.5\n").unwrap();
        assert_eq!(answerer.all_values(&Document::Spreadsheet(table)), "R$ 15,00");
        assert_eq!(answerer.all_values(&Document::Image("nada".to_string())), EMPTY_DOCUMENT_MESSAGE);
    }

    #[test]
    fn test_messages_are_distinct() {
        assert_ne!(NOT_FOUND_MESSAGE, NO_VALUES_MESSAGE);
        assert_eq!(render::<String>(Lookup::Found(Vec::new())), NO_VALUES_MESSAGE);
        assert_eq!(render::<String>(Lookup::NotFound), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_answerer_never_fails() {
        let answerer = HeuristicAnswerer::default();
        let doc = Document::Pdf(String::new());
        assert_eq!(block_on(answerer.answer(&doc, "frango")).unwrap(), NO_VALUES_MESSAGE);
    }
}
