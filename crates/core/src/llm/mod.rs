pub mod error;
pub mod openai;

use crate::domain::message::Message;

#[async_trait::async_trait]
pub trait ChatCompletionClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Sends the conversation as-is and returns the top completion choice.
    async fn complete(&self, messages: Vec<Message>) -> anyhow::Result<Message>;
}
