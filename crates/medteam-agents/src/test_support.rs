//! Scripted backend for unit tests

use crate::prompts;
use crate::role::AgentRole;
use async_trait::async_trait;
use medteam_llm::{ChatBackend, ChatMessage, Completion, LlmError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type ReplyFn = Box<dyn Fn(&[ChatMessage]) -> medteam_llm::Result<String> + Send + Sync>;
type DelayFn = Box<dyn Fn(&[ChatMessage]) -> Duration + Send + Sync>;

pub(crate) struct ScriptedBackend {
    reply: ReplyFn,
    delay: DelayFn,
    allow_blank: bool,
    calls: AtomicUsize,
    completed: Mutex<Vec<Option<AgentRole>>>,
}

impl ScriptedBackend {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&[ChatMessage]) -> medteam_llm::Result<String> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            delay: Box::new(|_| Duration::ZERO),
            allow_blank: false,
            calls: AtomicUsize::new(0),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Answers each specialist with "<Title> assessment", everything else with "ok"
    pub fn echo_roles() -> Self {
        Self::new(|messages| {
            Ok(match role_of(messages) {
                Some(role) => format!("{} assessment", role.title()),
                None => "ok".to_string(),
            })
        })
    }

    pub fn with_delay<F>(mut self, delay: F) -> Self
    where
        F: Fn(&[ChatMessage]) -> Duration + Send + Sync + 'static,
    {
        self.delay = Box::new(delay);
        self
    }

    /// Pass blank replies through instead of failing with `EmptyResponse`
    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Specialist roles in the order their calls finished
    pub fn completion_order(&self) -> Vec<Option<AgentRole>> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> medteam_llm::Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = (self.delay)(messages);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.completed.lock().unwrap().push(role_of(messages));

        let text = (self.reply)(messages)?;
        if text.trim().is_empty() && !self.allow_blank {
            return Err(LlmError::EmptyResponse);
        }
        Ok(Completion::new(text))
    }
}

/// Which specialist a request is for, judged by its system prompt
pub(crate) fn role_of(messages: &[ChatMessage]) -> Option<AgentRole> {
    let system = messages.first()?;
    AgentRole::ALL
        .into_iter()
        .find(|role| system.content == prompts::specialist_prompt(*role))
}
