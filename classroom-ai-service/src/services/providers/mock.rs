//! Mock provider implementation for testing.

use super::{ImagePart, ProviderError, VisionProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Behavior {
    Reply(String),
    Fail(String),
}

/// Mock vision provider that answers every call with a fixed reply or failure,
/// recording the prompts it received.
pub struct MockVisionProvider {
    behavior: Behavior,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    image_counts: Mutex<Vec<usize>>,
}

impl MockVisionProvider {
    /// Provider that returns `reply` verbatim.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(reply.into()))
    }

    /// Provider whose every call fails with an upstream API error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            image_counts: Mutex::new(Vec::new()),
        }
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    /// Images attached to the most recent call.
    pub fn last_image_count(&self) -> Option<usize> {
        self.image_counts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .copied()
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-vision"
    }

    async fn generate(&self, prompt: &str, images: &[ImagePart]) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());
        self.image_counts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(images.len());

        match &self.behavior {
            Behavior::Reply(text) => Ok(text.clone()),
            Behavior::Fail(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.behavior {
            Behavior::Reply(_) => Ok(()),
            Behavior::Fail(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }
}
