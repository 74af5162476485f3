//! Per-chunk summarization against an [`LlmBackend`]
//!
//! Chunks are submitted strictly one after another, in selection order.
//! A failed chunk does not end the run: it is recorded with a placeholder
//! text and the error, and the next chunk is sent. Authentication and
//! configuration failures are permanent, so once one is seen the remaining
//! chunks are marked failed without further requests.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use repoglance_config::LlmConfig;
use repoglance_llm::{LlmBackend, LlmError, LlmInvocation, Message};
use repoglance_packet::ContentChunk;

const SYSTEM_PROMPT: &str = "You are reviewing one part of a software repository. \
Summarize what these files do in two or three sentences, then list notable \
findings about architecture, security, testing, performance and code quality \
as bullet points starting with '- '. Be concrete and name files where relevant.";

/// Outcome of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStatus {
    Completed,
    Failed,
}

/// Summary of one chunk, or the placeholder left by a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkAnalysis {
    /// 1-based position in the chunk sequence
    pub index: usize,
    pub file_count: usize,
    pub status: ChunkStatus,
    pub text: String,
    /// Error label and message for failed chunks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Requests made, including a retry; 0 when the chunk was skipped
    pub attempts: u32,
    #[serde(skip)]
    pub cause: Option<LlmError>,
}

impl ChunkAnalysis {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == ChunkStatus::Completed
    }

    fn failed(
        index: usize,
        total: usize,
        chunk: &ContentChunk,
        error: &LlmError,
        attempts: u32,
    ) -> Self {
        Self {
            index,
            file_count: chunk.file_count,
            status: ChunkStatus::Failed,
            text: format!(
                "[Analysis unavailable for chunk {index} of {total}: {} error]",
                error.kind()
            ),
            error: Some(format!("{}: {error}", error.kind())),
            attempts,
            cause: Some(error.clone()),
        }
    }
}

/// Sends chunks to a backend one at a time.
pub struct ChunkSummarizer<'a> {
    backend: &'a dyn LlmBackend,
    model: String,
    timeout: Duration,
}

impl<'a> ChunkSummarizer<'a> {
    /// Model and timeout come from the `[llm]` section; an empty model lets
    /// the backend use its own default.
    #[must_use]
    pub fn new(backend: &'a dyn LlmBackend, llm: &LlmConfig) -> Self {
        Self {
            backend,
            model: llm.model.clone().unwrap_or_default(),
            timeout: llm.timeout(),
        }
    }

    fn invocation(&self, chunk: &ContentChunk, index: usize, total: usize) -> LlmInvocation {
        let user = format!(
            "Repository files, part {index} of {total} ({} files):\n\n{}",
            chunk.file_count, chunk.content
        );
        LlmInvocation::new(
            format!("chunk-{index}/{total}"),
            self.model.clone(),
            self.timeout,
            vec![Message::system(SYSTEM_PROMPT), Message::user(user)],
        )
    }

    /// Summarize every chunk in order. Always returns one analysis per chunk.
    pub async fn summarize(&self, chunks: &[ContentChunk]) -> Vec<ChunkAnalysis> {
        let total = chunks.len();
        let mut analyses = Vec::with_capacity(total);
        let mut permanent: Option<LlmError> = None;

        for (position, chunk) in chunks.iter().enumerate() {
            let index = position + 1;

            if let Some(error) = &permanent {
                debug!(chunk = index, "Skipping chunk after permanent provider failure");
                analyses.push(ChunkAnalysis::failed(index, total, chunk, error, 0));
                continue;
            }

            debug!(
                chunk = index,
                total,
                files = chunk.file_count,
                bytes = chunk.rendered_len(),
                provider = self.backend.name(),
                "Submitting chunk"
            );

            match self.backend.invoke(self.invocation(chunk, index, total)).await {
                Ok(result) => analyses.push(ChunkAnalysis {
                    index,
                    file_count: chunk.file_count,
                    status: ChunkStatus::Completed,
                    text: result.raw_response.trim().to_string(),
                    error: None,
                    attempts: result.attempts,
                    cause: None,
                }),
                Err(error) => {
                    warn!(
                        chunk = index,
                        total,
                        kind = error.kind(),
                        error = %error,
                        "Chunk analysis failed"
                    );
                    let attempts = self.backend.attempts_for(&error);
                    analyses.push(ChunkAnalysis::failed(index, total, chunk, &error, attempts));
                    if matches!(
                        error,
                        LlmError::ProviderAuth(_)
                            | LlmError::Misconfiguration(_)
                            | LlmError::Unsupported(_)
                    ) {
                        permanent = Some(error);
                    }
                }
            }
        }

        let completed = analyses.iter().filter(|a| a.is_completed()).count();
        info!(completed, total, "Chunk summarization finished");
        analyses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use repoglance_llm::{LlmResult, RetryingBackend};
    use std::sync::Mutex;

    /// Replies from a script; records every invocation it receives.
    struct ScriptedBackend {
        replies: Mutex<Vec<Result<LlmResult, LlmError>>>,
        seen: Mutex<Vec<LlmInvocation>>,
    }

    impl ScriptedBackend {
        fn new(mut replies: Vec<Result<LlmResult, LlmError>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmBackend for ScriptedBackend {
        async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
            self.seen.lock().unwrap().push(inv);
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(LlmResult::new("default", "mock", "m")))
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn chunk(content: &str) -> ContentChunk {
        ContentChunk {
            content: content.to_string(),
            file_count: 1,
            total_size: content.len(),
            paths: vec!["a".to_string()],
        }
    }

    #[tokio::test]
    async fn test_chunks_are_sent_in_order_with_context() {
        let backend = ScriptedBackend::new(vec![
            Ok(LlmResult::new(" first ", "mock", "m")),
            Ok(LlmResult::new("second", "mock", "m")),
        ]);
        let llm = LlmConfig {
            model: Some("test-model".to_string()),
            ..LlmConfig::default()
        };
        let summarizer = ChunkSummarizer::new(&backend, &llm);

        let analyses = summarizer.summarize(&[chunk("one"), chunk("two")]).await;

        assert_eq!(analyses.len(), 2);
        assert_eq!(analyses[0].text, "first");
        assert_eq!(analyses[1].index, 2);
        assert!(analyses.iter().all(ChunkAnalysis::is_completed));

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].request_id, "chunk-1/2");
        assert_eq!(seen[1].model, "test-model");
        assert_eq!(seen[1].messages.len(), 2);
        assert!(seen[1].messages[1].content.contains("part 2 of 2"));
        assert!(seen[1].messages[1].content.ends_with("two"));
    }

    #[tokio::test]
    async fn test_failure_leaves_placeholder_and_continues() {
        let backend = ScriptedBackend::new(vec![
            Err(LlmError::ProviderQuota("429".to_string())),
            Ok(LlmResult::new("fine", "mock", "m")),
        ]);
        let summarizer = ChunkSummarizer::new(&backend, &LlmConfig::default());

        let analyses = summarizer.summarize(&[chunk("a"), chunk("b")]).await;

        assert_eq!(analyses[0].status, ChunkStatus::Failed);
        assert_eq!(
            analyses[0].text,
            "[Analysis unavailable for chunk 1 of 2: quota error]"
        );
        assert!(analyses[0].error.as_deref().unwrap().starts_with("quota:"));
        assert!(matches!(analyses[0].cause, Some(LlmError::ProviderQuota(_))));
        assert!(analyses[1].is_completed());
        assert_eq!(backend.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_retry_reports_both_attempts() {
        let scripted = ScriptedBackend::new(vec![
            Err(LlmError::ProviderOutage("503".to_string())),
            Err(LlmError::ProviderOutage("502".to_string())),
            Err(LlmError::ProviderQuota("429".to_string())),
        ]);
        let backend = RetryingBackend::new(Box::new(scripted), Duration::from_millis(1));
        let summarizer = ChunkSummarizer::new(&backend, &LlmConfig::default());

        let analyses = summarizer.summarize(&[chunk("a"), chunk("b")]).await;

        assert_eq!(analyses[0].status, ChunkStatus::Failed);
        assert_eq!(analyses[0].attempts, 2);
        assert_eq!(analyses[1].status, ChunkStatus::Failed);
        assert_eq!(analyses[1].attempts, 1);
    }

    #[tokio::test]
    async fn test_auth_failure_skips_remaining_requests() {
        let backend = ScriptedBackend::new(vec![Err(LlmError::ProviderAuth("401".to_string()))]);
        let summarizer = ChunkSummarizer::new(&backend, &LlmConfig::default());

        let analyses = summarizer
            .summarize(&[chunk("a"), chunk("b"), chunk("c")])
            .await;

        assert_eq!(analyses.len(), 3);
        assert!(analyses.iter().all(|a| a.status == ChunkStatus::Failed));
        assert_eq!(analyses[2].attempts, 0);
        assert_eq!(backend.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_chunks_no_requests() {
        let backend = ScriptedBackend::new(vec![]);
        let summarizer = ChunkSummarizer::new(&backend, &LlmConfig::default());

        assert!(summarizer.summarize(&[]).await.is_empty());
        assert!(backend.seen.lock().unwrap().is_empty());
    }
}
