//! Report generation: persona framing in front of a chat completion.
//!
//! The gateway is stateless. Each call owns its conversation, prepends one system
//! instruction chosen by persona, and forwards the result to the completion provider.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::message::Message;
use crate::domain::persona::InvestorPersona;
use crate::llm::ChatCompletionClient;

/// Body of `POST /generate-report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReportRequest {
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
}

pub fn system_instruction(label: &str) -> String {
    format!(
        "You are a financial analyst writing a report for a {label}. Use language and insights appropriate for a {label}."
    )
}

/// Picks the label interpolated into the system instruction. An absent or empty tag becomes
/// `beginner`; any other tag is used verbatim, including ones outside the gateway's table.
pub fn resolve_persona(tag: Option<&str>) -> &str {
    match tag {
        None | Some("") => InvestorPersona::default().gateway_label(),
        Some(tag) => {
            if InvestorPersona::from_gateway_label(tag).is_none() {
                tracing::warn!(persona = tag, "persona tag is not a known gateway label");
            }
            tag
        }
    }
}

/// Prepends the persona instruction. An existing leading system message is kept, so the
/// result may hold two system messages.
pub fn prepare_conversation(request: GenerateReportRequest) -> anyhow::Result<Vec<Message>> {
    anyhow::ensure!(!request.messages.is_empty(), "messages must be non-empty");

    let instruction = system_instruction(resolve_persona(request.persona.as_deref()));
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    messages.push(Message::system(instruction));
    messages.extend(request.messages);
    Ok(messages)
}

#[derive(Clone)]
pub struct ReportGateway {
    completion: Arc<dyn ChatCompletionClient>,
}

impl ReportGateway {
    pub fn new(completion: Arc<dyn ChatCompletionClient>) -> Self {
        Self { completion }
    }

    pub fn provider_name(&self) -> &'static str {
        self.completion.provider_name()
    }

    pub async fn generate_report(&self, request: GenerateReportRequest) -> anyhow::Result<Message> {
        let messages = prepare_conversation(request)?;
        tracing::info!(
            provider = self.completion.provider_name(),
            message_count = messages.len(),
            "forwarding report conversation"
        );
        self.completion.complete(messages).await
    }
}

impl std::fmt::Debug for ReportGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportGateway")
            .field("provider", &self.completion.provider_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::Role;
    use std::sync::Mutex;

    struct RecordingCompletion {
        seen: Mutex<Vec<Vec<Message>>>,
        fail: bool,
    }

    impl RecordingCompletion {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    #[async_trait::async_trait]
    impl ChatCompletionClient for RecordingCompletion {
        fn provider_name(&self) -> &'static str {
            "recording"
        }

        async fn complete(&self, messages: Vec<Message>) -> anyhow::Result<Message> {
            self.seen.lock().unwrap().push(messages);
            if self.fail {
                anyhow::bail!("provider unavailable");
            }
            Ok(Message::assistant("AAPL report"))
        }
    }

    fn request(persona: Option<&str>) -> GenerateReportRequest {
        GenerateReportRequest {
            messages: vec![Message::user("Analyze AAPL")],
            persona: persona.map(str::to_string),
        }
    }

    #[test]
    fn missing_persona_defaults_to_beginner() {
        let messages = prepare_conversation(request(None)).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("beginner"));
        assert_eq!(messages[1], Message::user("Analyze AAPL"));
    }

    #[test]
    fn gateway_label_selects_persona() {
        let messages = prepare_conversation(request(Some("value investor"))).unwrap();
        assert_eq!(
            messages[0].content,
            "You are a financial analyst writing a report for a value investor. \
             Use language and insights appropriate for a value investor."
        );
    }

    #[test]
    fn empty_persona_defaults_to_beginner() {
        let messages = prepare_conversation(request(Some(""))).unwrap();
        assert!(messages[0].content.contains("for a beginner."));
    }

    #[test]
    fn hyphenated_client_tag_is_interpolated_verbatim() {
        let messages = prepare_conversation(request(Some("active-trader"))).unwrap();
        assert_eq!(
            messages[0].content,
            "You are a financial analyst writing a report for a active-trader. \
             Use language and insights appropriate for a active-trader."
        );
    }

    #[test]
    fn existing_system_message_is_not_deduplicated() {
        let req = GenerateReportRequest {
            messages: vec![Message::system("be terse"), Message::user("Analyze MSFT")],
            persona: Some("active trader".to_string()),
        };
        let messages = prepare_conversation(req).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1], Message::system("be terse"));
        assert_eq!(messages[2], Message::user("Analyze MSFT"));
    }

    #[test]
    fn empty_messages_are_rejected() {
        let req = GenerateReportRequest {
            messages: Vec::new(),
            persona: None,
        };
        assert!(prepare_conversation(req).is_err());
    }

    #[tokio::test]
    async fn forwards_augmented_conversation() {
        let completion = RecordingCompletion::new(false);
        let gateway = ReportGateway::new(completion.clone());

        let reply = gateway.generate_report(request(None)).await.unwrap();
        assert_eq!(reply, Message::assistant("AAPL report"));

        let seen = completion.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0].role, Role::System);
        assert!(seen[0][0].content.contains("beginner"));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let gateway = ReportGateway::new(RecordingCompletion::new(true));
        let err = gateway.generate_report(request(None)).await.unwrap_err();
        assert_eq!(err.to_string(), "provider unavailable");
    }

    #[tokio::test]
    async fn empty_conversation_never_reaches_provider() {
        let completion = RecordingCompletion::new(false);
        let gateway = ReportGateway::new(completion.clone());
        let req = GenerateReportRequest {
            messages: Vec::new(),
            persona: None,
        };

        assert!(gateway.generate_report(req).await.is_err());
        assert!(completion.seen.lock().unwrap().is_empty());
    }
}
