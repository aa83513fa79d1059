// src/answer/mod.rs
pub mod chat;
pub mod heuristic;

use crate::documents::Document;
use crate::utils::error::AnswerError;
use async_trait::async_trait;

pub use chat::{ChatAnswerer, ChatSettings};
pub use heuristic::HeuristicAnswerer;

/// Something that turns a document and a question into a rendered answer.
#[async_trait]
pub trait Answerer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn answer(&self, document: &Document, question: &str) -> Result<String, AnswerError>;
}

/// Which step of a [`FallbackAnswerer`] produced the answer.
#[derive(Debug)]
pub enum AnswerSource {
    Primary,
    /// The primary failed with this error and the secondary answered instead.
    Fallback(AnswerError),
}

#[derive(Debug)]
pub struct Answered {
    pub text: String,
    pub source: AnswerSource,
}

/// Two-step strategy: ask the primary, and only on a typed failure ask the secondary.
pub struct FallbackAnswerer<P, S> {
    primary: P,
    secondary: S,
}

impl<P: Answerer, S: Answerer> FallbackAnswerer<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub async fn answer_with_source(
        &self,
        document: &Document,
        question: &str,
    ) -> Result<Answered, AnswerError> {
        let failure = match self.primary.answer(document, question).await {
            Ok(text) => return Ok(Answered { text, source: AnswerSource::Primary }),
            Err(e) => e,
        };

        tracing::warn!(
            "{} failed ({}), falling back to {}",
            self.primary.name(),
            failure,
            self.secondary.name()
        );
        let text = self.secondary.answer(document, question).await?;
        Ok(Answered { text, source: AnswerSource::Fallback(failure) })
    }
}

#[async_trait]
impl<P: Answerer, S: Answerer> Answerer for FallbackAnswerer<P, S> {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn answer(&self, document: &Document, question: &str) -> Result<String, AnswerError> {
        let answered = self.answer_with_source(document, question).await?;
        if let AnswerSource::Fallback(reason) = &answered.source {
            tracing::info!("Answered by {} after primary failure: {}", self.secondary.name(), reason);
        }
        Ok(answered.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    struct Fixed(&'static str);
    struct Failing;

    #[async_trait]
    impl Answerer for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }
        async fn answer(&self, _: &Document, _: &str) -> Result<String, AnswerError> {
            Ok(self.0.to_string())
        }
    }

    #[async_trait]
    impl Answerer for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        async fn answer(&self, _: &Document, _: &str) -> Result<String, AnswerError> {
            Err(AnswerError::Unavailable("no key".to_string()))
        }
    }

    fn doc() -> Document {
        Document::Pdf("Frango R$ 8,99".to_string())
    }

    #[test]
    fn test_primary_answer_is_used() {
        let strategy = FallbackAnswerer::new(Fixed("remote"), Fixed("local"));
        let answered = block_on(strategy.answer_with_source(&doc(), "frango")).unwrap();
        assert_eq!(answered.text, "remote");
        assert!(matches!(answered.source, AnswerSource::Primary));
    }

    #[test]
    fn test_typed_failure_triggers_fallback() {
        let strategy = FallbackAnswerer::new(Failing, Fixed("local"));
        let answered = block_on(strategy.answer_with_source(&doc(), "frango")).unwrap();
        assert_eq!(answered.text, "local");
        assert!(matches!(
            answered.source,
            AnswerSource::Fallback(AnswerError::Unavailable(_))
        ));
    }

    #[test]
    fn test_both_steps_failing_surfaces_secondary_error() {
        let strategy = FallbackAnswerer::new(Failing, Failing);
        assert!(block_on(strategy.answer(&doc(), "frango")).is_err());
    }
}
