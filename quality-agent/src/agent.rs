use ai_llm_service::OpenRouterService;
use tracing::{debug, instrument};

use crate::{
    parser::parse_sections, persona::DEFAULT_PERSONA, prompt::compose_prompt,
    response::QualityResponse,
};

const CAPA_CONTEXT: &str =
    "This is a quality issue requiring root cause analysis and corrective actions.";
const AUDIT_CONTEXT: &str = "This is an ISO 9001 audit non-conformity.";

/// Quality-manager assistant: one persona, one gateway.
///
/// Holds no mutable state; share it behind an `Arc` across requests.
#[derive(Debug)]
pub struct QualityAgent {
    llm: OpenRouterService,
    persona: String,
}

impl QualityAgent {
    /// Agent with [`DEFAULT_PERSONA`].
    pub fn new(llm: OpenRouterService) -> Self {
        Self::with_persona(llm, DEFAULT_PERSONA)
    }

    pub fn with_persona(llm: OpenRouterService, persona: impl Into<String>) -> Self {
        Self {
            llm,
            persona: persona.into(),
        }
    }

    /// Configured model id.
    pub fn model(&self) -> &str {
        &self.llm.config().model
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Asks a question and returns the six-section answer.
    ///
    /// Never fails: upstream errors end up as text and the missing sections
    /// get their defaults.
    #[instrument(skip_all, fields(question_len = question.len(), has_context = context.is_some()))]
    pub async fn ask(&self, question: &str, context: Option<&str>) -> QualityResponse {
        let prompt = compose_prompt(question, context);
        let raw = self.llm.answer(&prompt, Some(&self.persona), None).await;
        let parsed = parse_sections(&raw);
        debug!(
            raw_len = raw.len(),
            found_context = !parsed.context.is_empty(),
            found_conclusion = !parsed.conclusion.is_empty(),
            "parsed reply"
        );
        QualityResponse::from_sections(parsed, question)
    }

    /// Sends `message` as-is and returns the unparsed answer (or error text).
    pub async fn ask_raw(&self, message: &str, max_tokens: Option<u32>) -> String {
        self.llm.answer(message, Some(&self.persona), max_tokens).await
    }

    /// Corrective and preventive action analysis for a quality issue.
    pub async fn capa(&self, issue: &str) -> QualityResponse {
        self.ask(&format!("Perform CAPA analysis for: {issue}"), Some(CAPA_CONTEXT))
            .await
    }

    /// Evaluation of an audit finding.
    pub async fn audit(&self, finding: &str) -> QualityResponse {
        self.ask(&format!("Evaluate this audit finding: {finding}"), Some(AUDIT_CONTEXT))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::LlmModelConfig;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    fn agent(server: &ServerGuard) -> QualityAgent {
        let cfg = LlmModelConfig {
            model: "test/model".into(),
            endpoint: server.url(),
            api_key: "k".into(),
            max_tokens: 300,
            temperature: 0.2,
            timeout_secs: 5,
            referer: None,
            title: None,
        };
        QualityAgent::new(OpenRouterService::new(cfg).unwrap())
    }

    fn completion(content: &str) -> String {
        json!({ "choices": [ { "message": { "content": content } } ] }).to_string()
    }

    #[tokio::test]
    async fn ask_parses_template_reply() {
        let mut server = Server::new_async().await;
        let reply = "**Context:** Supplier evaluation\n\n**Analysis:** Clause 8.4 applies.\n\n\
                     **Risks:** Late deliveries\n\n**Recommendation:** Define criteria\n\n\
                     **ISO Clause:** 8.4.1\n\n**Conclusion:** Formalize the process";
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex("Question: How do I evaluate suppliers\\?".into()))
            .with_status(200)
            .with_body(completion(reply))
            .expect(1)
            .create_async()
            .await;

        let r = agent(&server).ask("How do I evaluate suppliers?", None).await;

        assert_eq!(r.context, "Supplier evaluation");
        assert_eq!(r.iso_clause, "8.4.1");
        assert_eq!(r.conclusion, "Formalize the process");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upstream_failure_yields_defaults_with_error_in_context_slot() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body(r#"{"error":{"message":"boom"}}"#)
            .expect(1)
            .create_async()
            .await;

        let r = agent(&server).ask("What is clause 9.2?", None).await;

        // Error text has no markers, so every section falls back.
        assert_eq!(r.context, "What is clause 9.2?");
        assert_eq!(r.analysis, "Analysis not available");
        assert_eq!(r.conclusion, "Analysis complete");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn capa_and_audit_compose_their_prompts() {
        let mut server = Server::new_async().await;
        let capa = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("Perform CAPA analysis for: packaging complaints".into()),
                Matcher::Regex("root cause analysis and corrective actions".into()),
            ]))
            .with_status(200)
            .with_body(completion("**Context:** capa"))
            .expect(1)
            .create_async()
            .await;
        let audit = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("Evaluate this audit finding: no review records".into()),
                Matcher::Regex("audit non-conformity".into()),
            ]))
            .with_status(200)
            .with_body(completion("**Context:** audit"))
            .expect(1)
            .create_async()
            .await;

        let a = agent(&server);
        assert_eq!(a.capa("packaging complaints").await.context, "capa");
        assert_eq!(a.audit("no review records").await.context, "audit");
        capa.assert_async().await;
        audit.assert_async().await;
    }

    #[tokio::test]
    async fn ask_raw_sends_message_verbatim_with_persona() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({ "max_tokens": 120 })),
                Matcher::Regex("Senior Quality Manager".into()),
                Matcher::Regex("What is clause 8.5.1\\?".into()),
            ]))
            .with_status(200)
            .with_body(completion("  plain answer "))
            .expect(1)
            .create_async()
            .await;

        let out = agent(&server).ask_raw("What is clause 8.5.1?", Some(120)).await;

        assert_eq!(out, "plain answer");
        mock.assert_async().await;
    }

    #[test]
    fn model_comes_from_config() {
        let cfg = LlmModelConfig {
            model: "x/y".into(),
            endpoint: "http://localhost".into(),
            api_key: "k".into(),
            max_tokens: 300,
            temperature: 0.2,
            timeout_secs: 5,
            referer: None,
            title: None,
        };
        let a = QualityAgent::with_persona(OpenRouterService::new(cfg).unwrap(), "p");
        assert_eq!(a.model(), "x/y");
        assert_eq!(a.persona(), "p");
    }
}
