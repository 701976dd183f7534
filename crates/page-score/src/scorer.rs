/// Score aggregation over the five factor queries.
///
/// One scoring run issues five independent chat queries, one per factor, all
/// concurrently. A factor whose call fails parses as an absent response and
/// takes its default score; one factor's timeout never blocks or fails the
/// others. The run only errors when the page itself has nothing to score.
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures::future::join_all;
use tracing::{debug, warn};

use score_common::chat::{ChatClient, ChatRequest};
use score_common::error::CommonError;
use score_common::usage::UsageTracker;

use crate::content::PageRecord;
use crate::error::AppError;
use crate::model::{weighted_overall, Factor, ScoreFactor, ScoreReport, ScoringProfile};
use crate::parser::parse_score_response;

const SHORT_CONTENT_DETAILS: &str = "Content too short for analysis";

/// Seam to the chat completion service. The production implementation is
/// `ChatClient`; tests inject a scripted mock.
pub trait FactorChat: Send + Sync {
    fn evaluate(
        &self,
        message: String,
        instructions: String,
    ) -> impl Future<Output = Result<String, CommonError>> + Send;
}

impl FactorChat for ChatClient {
    async fn evaluate(
        &self,
        message: String,
        instructions: String,
    ) -> Result<String, CommonError> {
        // Deterministic, retrieval-free evaluation: the content under review is
        // the whole context.
        let response = self
            .ask(
                ChatRequest {
                    message,
                    instructions,
                    use_public_knowledge: true,
                    skip_context_retrieval: true,
                    temperature: 0.0,
                    max_tokens: 10_000,
                },
                None,
            )
            .await?;
        Ok(response)
    }
}

pub struct PageScorer<C> {
    chat: Arc<C>,
    profile: ScoringProfile,
    usage: UsageTracker,
}

impl<C: FactorChat> PageScorer<C> {
    pub fn new(chat: Arc<C>, profile: ScoringProfile, usage: UsageTracker) -> Self {
        Self {
            chat,
            profile,
            usage,
        }
    }

    /// Produce a complete report for a page, or fail if it has no content.
    pub async fn score(&self, page: &PageRecord) -> Result<ScoreReport, AppError> {
        let Some(content) = page.content.as_deref() else {
            return Err(AppError::NoContent(page.title.clone()));
        };

        if content.chars().count() < self.profile.min_content_chars {
            debug!(page = %page.title, "content too short, skipping remote calls");
            return Ok(self.short_content_report(page));
        }

        // Cap the outbound payload; counted in chars, not bytes, so multi-byte
        // text truncates cleanly.
        let summary: String = content.chars().take(self.profile.max_content_chars).collect();

        let queries = Factor::ALL.map(|factor| {
            let summary = summary.clone();
            async move { (factor, self.query_factor(factor, summary).await) }
        });

        let factors: BTreeMap<Factor, ScoreFactor> = join_all(queries).await.into_iter().collect();
        let overall_score = weighted_overall(&self.profile, &factors);

        Ok(ScoreReport {
            overall_score,
            factors,
            timestamp: now_unix(),
            page_id: page.page_id,
            page_title: page.title.clone(),
        })
    }

    async fn query_factor(&self, factor: Factor, summary: String) -> ScoreFactor {
        let raw = match self
            .chat
            .evaluate(summary, factor_instructions(factor).to_string())
            .await
        {
            Ok(text) => {
                self.usage.record(factor.name(), true).await;
                Some(text)
            }
            Err(e) => {
                warn!(factor = factor.name(), error = %e, "factor query failed, using default score");
                self.usage.record(factor.name(), false).await;
                None
            }
        };
        parse_score_response(raw.as_deref(), self.profile.factor(factor).default_score)
    }

    fn short_content_report(&self, page: &PageRecord) -> ScoreReport {
        let factors: BTreeMap<Factor, ScoreFactor> = Factor::ALL
            .iter()
            .map(|factor| {
                (
                    *factor,
                    ScoreFactor {
                        score: self.profile.short_content_score,
                        details: SHORT_CONTENT_DETAILS.to_string(),
                    },
                )
            })
            .collect();

        ScoreReport {
            overall_score: self.profile.short_content_score,
            factors,
            timestamp: now_unix(),
            page_id: page.page_id,
            page_title: page.title.clone(),
        }
    }
}

/// The evaluation preamble sent with each factor query. Every template pins the
/// reply format the parser expects.
fn factor_instructions(factor: Factor) -> &'static str {
    match factor {
        Factor::Bias => {
            "Analyze the following wiki page content for bias. Rate it on a scale of 0-100 \
             where 100 means completely neutral and unbiased, and 0 means extremely biased. \
             Provide a brief explanation. Format your response as: SCORE: [number] DETAILS: [explanation]"
        }
        Factor::LlmGenerated => {
            "Analyze if the following wiki page content appears to be AI/LLM-generated. \
             Rate it on a scale of 0-100 where 100 means definitely human-written and original, \
             and 0 means definitely AI-generated. Look for signs like repetitive patterns, \
             generic phrasing, or lack of personal voice. Format your response as: SCORE: [number] \
             DETAILS: [explanation]"
        }
        Factor::Language => {
            "Evaluate the language quality of the following wiki page content. \
             Rate it on a scale of 0-100 where 100 means excellent, clear, professional language, \
             and 0 means poor language quality. Consider clarity, vocabulary, and readability. \
             Format your response as: SCORE: [number] DETAILS: [explanation]"
        }
        Factor::Grammar => {
            "Check the grammar and spelling of the following wiki page content. \
             Rate it on a scale of 0-100 where 100 means perfect grammar with no errors, \
             and 0 means numerous grammar and spelling errors. \
             Format your response as: SCORE: [number] DETAILS: [explanation]"
        }
        Factor::Conciseness => {
            "Evaluate the conciseness of the following wiki page content. \
             Rate it on a scale of 0-100 where 100 means perfectly concise with no unnecessary verbosity, \
             and 0 means extremely verbose and repetitive. \
             Format your response as: SCORE: [number] DETAILS: [explanation]"
        }
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use score_common::chat::ChatClientError;
    use score_common::redis::RedisStore;

    use super::*;

    /// Scripted chat backend: answers per factor, counts calls, records the
    /// message payloads it was handed.
    struct ScriptedChat {
        replies: BTreeMap<Factor, Result<String, ()>>,
        calls: AtomicUsize,
        messages: Mutex<Vec<String>>,
    }

    impl ScriptedChat {
        fn new(replies: BTreeMap<Factor, Result<String, ()>>) -> Self {
            Self {
                replies,
                calls: AtomicUsize::new(0),
                messages: Mutex::new(Vec::new()),
            }
        }

        fn answering_all(reply: &str) -> Self {
            Self::new(
                Factor::ALL
                    .iter()
                    .map(|f| (*f, Ok(reply.to_string())))
                    .collect(),
            )
        }
    }

    impl FactorChat for ScriptedChat {
        async fn evaluate(
            &self,
            message: String,
            instructions: String,
        ) -> Result<String, CommonError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.messages.lock().unwrap().push(message);
            let factor = factor_for(&instructions);
            match self.replies.get(&factor) {
                Some(Ok(text)) => Ok(text.clone()),
                _ => Err(CommonError::Chat(ChatClientError::MissingResponse)),
            }
        }
    }

    /// Recover the factor from its instruction template.
    fn factor_for(instructions: &str) -> Factor {
        if instructions.contains("for bias") {
            Factor::Bias
        } else if instructions.contains("AI/LLM-generated") {
            Factor::LlmGenerated
        } else if instructions.contains("language quality") {
            Factor::Language
        } else if instructions.contains("grammar and spelling") {
            Factor::Grammar
        } else {
            Factor::Conciseness
        }
    }

    fn scorer(chat: Arc<ScriptedChat>) -> PageScorer<ScriptedChat> {
        PageScorer::new(
            chat,
            ScoringProfile::default(),
            UsageTracker::new(RedisStore::new(None)),
        )
    }

    fn page(content: Option<&str>) -> PageRecord {
        PageRecord {
            page_id: 7,
            title: "Test Page".to_string(),
            content: content.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_no_content_is_an_error() {
        let chat = Arc::new(ScriptedChat::answering_all("SCORE: 90 DETAILS: ok"));
        let result = scorer(Arc::clone(&chat)).score(&page(None)).await;
        assert!(matches!(result, Err(AppError::NoContent(_))));
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_short_content_skips_remote_calls() {
        let chat = Arc::new(ScriptedChat::answering_all("SCORE: 90 DETAILS: ok"));
        let report = scorer(Arc::clone(&chat))
            .score(&page(Some("short text")))
            .await
            .unwrap();

        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.overall_score, 50);
        assert_eq!(report.factors.len(), 5);
        for factor in report.factors.values() {
            assert_eq!(factor.score, 50);
            assert_eq!(factor.details, "Content too short for analysis");
        }
    }

    #[tokio::test]
    async fn test_all_factors_scored_and_weighted() {
        let replies: BTreeMap<Factor, Result<String, ()>> = [
            (Factor::Bias, Ok("SCORE: 80 DETAILS: slight slant".to_string())),
            (Factor::LlmGenerated, Ok("SCORE: 60 DETAILS: some generic phrasing".to_string())),
            (Factor::Language, Ok("SCORE: 90 DETAILS: reads well".to_string())),
            (Factor::Grammar, Ok("SCORE: 70 DETAILS: a few typos".to_string())),
            (Factor::Conciseness, Ok("SCORE: 50 DETAILS: repetitive".to_string())),
        ]
        .into_iter()
        .collect();
        let chat = Arc::new(ScriptedChat::new(replies));

        let content = "long enough page content ".repeat(10);
        let report = scorer(Arc::clone(&chat))
            .score(&page(Some(&content)))
            .await
            .unwrap();

        assert_eq!(chat.calls.load(Ordering::SeqCst), 5);
        assert_eq!(report.factors[&Factor::Bias].score, 80);
        assert_eq!(report.factors[&Factor::Conciseness].score, 50);
        assert_eq!(report.factors[&Factor::Language].details, "<p>reads well</p>");
        // (80*1.5 + 60*1.0 + 90*1.2 + 70*1.2 + 50*1.0) / 5.9 -> 72
        assert_eq!(report.overall_score, 72);
        assert_eq!(report.page_id, 7);
        assert_eq!(report.page_title, "Test Page");
    }

    #[tokio::test]
    async fn test_failed_factor_takes_default_without_aborting_others() {
        let mut replies: BTreeMap<Factor, Result<String, ()>> = Factor::ALL
            .iter()
            .map(|f| (*f, Ok("SCORE: 90 DETAILS: ok".to_string())))
            .collect();
        replies.insert(Factor::Bias, Err(()));
        let chat = Arc::new(ScriptedChat::new(replies));

        let content = "long enough page content ".repeat(10);
        let report = scorer(chat).score(&page(Some(&content))).await.unwrap();

        let bias = &report.factors[&Factor::Bias];
        assert_eq!(bias.score, 80); // bias default
        assert_eq!(bias.details, "Unable to analyze this factor");
        for factor in [
            Factor::LlmGenerated,
            Factor::Language,
            Factor::Grammar,
            Factor::Conciseness,
        ] {
            assert_eq!(report.factors[&factor].score, 90);
        }
    }

    #[tokio::test]
    async fn test_content_truncated_by_chars() {
        let chat = Arc::new(ScriptedChat::answering_all("SCORE: 90 DETAILS: ok"));
        // Multi-byte chars make a byte-wise cap visibly wrong.
        let content: String = "é".repeat(5000);
        scorer(Arc::clone(&chat))
            .score(&page(Some(&content)))
            .await
            .unwrap();

        let messages = chat.messages.lock().unwrap();
        assert_eq!(messages.len(), 5);
        for message in messages.iter() {
            assert_eq!(message.chars().count(), 3000);
        }
    }
}
