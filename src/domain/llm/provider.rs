use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for chat completion providers
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::{Message, MessageRole};
    use std::sync::Mutex;

    /// Scripted provider: replies are picked by the first rule whose needle
    /// appears in the user message, falling back to the default reply.
    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        rules: Vec<(String, Result<String, String>)>,
        default_reply: Option<String>,
        error: Option<String>,
        requests: Mutex<Vec<LlmRequest>>,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                rules: Vec::new(),
                default_reply: None,
                error: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(mut self, content: impl Into<String>) -> Self {
            self.default_reply = Some(content.into());
            self
        }

        pub fn with_response_when(
            mut self,
            needle: impl Into<String>,
            content: impl Into<String>,
        ) -> Self {
            self.rules.push((needle.into(), Ok(content.into())));
            self
        }

        pub fn with_error_when(mut self, needle: impl Into<String>, error: impl Into<String>) -> Self {
            self.rules.push((needle.into(), Err(error.into())));
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_request(&self) -> Option<LlmRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
            let user_text = request.text_for(MessageRole::User);
            self.requests.lock().unwrap().push(request);

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            let reply = self
                .rules
                .iter()
                .find(|(needle, _)| user_text.contains(needle.as_str()))
                .map(|(_, reply)| reply.clone())
                .or_else(|| self.default_reply.clone().map(Ok))
                .ok_or_else(|| DomainError::provider(self.name, "No mock response configured"))?;

            match reply {
                Ok(content) => Ok(LlmResponse::new("mock-id", model, Message::assistant(content))),
                Err(error) => Err(DomainError::provider(self.name, error)),
            }
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
