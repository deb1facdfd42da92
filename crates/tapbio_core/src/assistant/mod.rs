//! Writing-assistant chat session.
//!
//! # Responsibility
//! - Keep the chat transcript shown next to the editor.
//! - Forward user turns to a pluggable `ChatProvider`.
//!
//! # Invariants
//! - Provider failures never escape `ChatSession::send`; they are logged and
//!   replaced by `APOLOGY_REPLY`.
//! - An empty provider reply is replaced by `EMPTY_REPLY`.
//! - Blank user input is ignored and leaves the transcript unchanged.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const SYSTEM_INSTRUCTION: &str = "You are TapBio AI, a helpful assistant for the TapBio minimalist bio-link builder app (powered by AndoKore). \
You help users write catchy bios, suggest link titles, and provide technical support for the app. \
Keep your answers concise, helpful, and friendly.";
/// Reasoning budget requested when thinking mode is on.
pub const THINKING_BUDGET_TOKENS: u32 = 32_768;
pub const GREETING: &str =
    "Hi! I can help you improve your bio or suggest creative links. Just ask!";
pub const APOLOGY_REPLY: &str = "Sorry, something went wrong. Please try again.";
pub const EMPTY_REPLY: &str = "I couldn't generate a response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    /// Set on model replies produced with thinking mode on.
    #[serde(default)]
    pub is_thinking: bool,
}

impl ChatMessage {
    fn new(role: ChatRole, text: impl Into<String>, is_thinking: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            is_thinking,
        }
    }
}

/// One turn sent to the provider.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system_instruction: &'a str,
    /// Earlier turns, oldest first, excluding `message`.
    pub history: &'a [ChatMessage],
    pub message: &'a str,
    pub thinking_budget: Option<u32>,
}

#[derive(Debug)]
pub enum ChatError {
    /// The provider could not be reached.
    Transport(String),
    /// The provider answered with an error.
    Provider(String),
    /// No credentials or endpoint configured.
    Unconfigured,
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "chat transport failed: {message}"),
            Self::Provider(message) => write!(f, "chat provider error: {message}"),
            Self::Unconfigured => write!(f, "chat provider is not configured"),
        }
    }
}

impl Error for ChatError {}

/// Text generation backend.
pub trait ChatProvider {
    fn send(&mut self, request: &ChatRequest<'_>) -> Result<String, ChatError>;
}

/// Transcript plus provider for one assistant panel.
pub struct ChatSession<P: ChatProvider> {
    provider: P,
    messages: Vec<ChatMessage>,
    thinking: bool,
}

impl<P: ChatProvider> ChatSession<P> {
    /// Starts a session whose transcript holds the greeting.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            messages: vec![ChatMessage {
                id: "init".to_string(),
                role: ChatRole::Model,
                text: GREETING.to_string(),
                is_thinking: false,
            }],
            thinking: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn thinking(&self) -> bool {
        self.thinking
    }

    pub fn set_thinking(&mut self, enabled: bool) {
        self.thinking = enabled;
    }

    /// Sends `input` and appends both turns to the transcript.
    ///
    /// Returns the appended model reply, or `None` when `input` is blank.
    pub fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        let history_len = self.messages.len();
        self.messages
            .push(ChatMessage::new(ChatRole::User, text, false));

        let request = ChatRequest {
            system_instruction: SYSTEM_INSTRUCTION,
            history: &self.messages[..history_len],
            message: text,
            thinking_budget: self.thinking.then_some(THINKING_BUDGET_TOKENS),
        };
        let reply = match self.provider.send(&request) {
            Ok(reply) if reply.trim().is_empty() => {
                info!("event=chat_reply module=assistant status=empty");
                EMPTY_REPLY.to_string()
            }
            Ok(reply) => {
                info!(
                    "event=chat_reply module=assistant status=ok thinking={} reply_len={}",
                    self.thinking,
                    reply.len()
                );
                reply
            }
            Err(err) => {
                warn!(
                    "event=chat_reply module=assistant status=error thinking={} error={}",
                    self.thinking, err
                );
                APOLOGY_REPLY.to_string()
            }
        };

        self.messages
            .push(ChatMessage::new(ChatRole::Model, reply, self.thinking));
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ChatError, ChatProvider, ChatRequest, ChatRole, ChatSession, APOLOGY_REPLY, EMPTY_REPLY,
        GREETING, THINKING_BUDGET_TOKENS,
    };

    #[derive(Default)]
    struct ScriptedProvider {
        replies: Vec<Result<String, ChatError>>,
        seen: Vec<(String, usize, Option<u32>)>,
    }

    impl ChatProvider for ScriptedProvider {
        fn send(&mut self, request: &ChatRequest<'_>) -> Result<String, ChatError> {
            self.seen.push((
                request.message.to_string(),
                request.history.len(),
                request.thinking_budget,
            ));
            if self.replies.is_empty() {
                return Err(ChatError::Unconfigured);
            }
            self.replies.remove(0)
        }
    }

    #[test]
    fn new_session_starts_with_greeting() {
        let session = ChatSession::new(ScriptedProvider::default());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, ChatRole::Model);
        assert_eq!(session.messages()[0].text, GREETING);
    }

    #[test]
    fn reply_is_appended_after_user_turn() {
        let provider = ScriptedProvider {
            replies: vec![Ok("Try a shorter bio.".to_string())],
            ..ScriptedProvider::default()
        };
        let mut session = ChatSession::new(provider);

        let reply = session.send("  help me  ").expect("reply");
        assert_eq!(reply.text, "Try a shorter bio.");
        assert!(!reply.is_thinking);

        let roles: Vec<ChatRole> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::Model, ChatRole::User, ChatRole::Model]);
        assert_eq!(session.messages()[1].text, "help me");
        assert_eq!(session.provider.seen, vec![("help me".to_string(), 1, None)]);
    }

    #[test]
    fn provider_failure_becomes_apology() {
        let provider = ScriptedProvider {
            replies: vec![Err(ChatError::Transport("timeout".to_string()))],
            ..ScriptedProvider::default()
        };
        let mut session = ChatSession::new(provider);

        assert_eq!(session.send("hi").expect("reply").text, APOLOGY_REPLY);
    }

    #[test]
    fn empty_reply_is_replaced() {
        let provider = ScriptedProvider {
            replies: vec![Ok("   ".to_string())],
            ..ScriptedProvider::default()
        };
        let mut session = ChatSession::new(provider);

        assert_eq!(session.send("hi").expect("reply").text, EMPTY_REPLY);
    }

    #[test]
    fn thinking_mode_sets_budget_and_flags_reply() {
        let provider = ScriptedProvider {
            replies: vec![Ok("Deep answer".to_string())],
            ..ScriptedProvider::default()
        };
        let mut session = ChatSession::new(provider);
        session.set_thinking(true);

        assert!(session.send("why?").expect("reply").is_thinking);
        assert_eq!(
            session.provider.seen[0].2,
            Some(THINKING_BUDGET_TOKENS)
        );
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut session = ChatSession::new(ScriptedProvider::default());
        assert!(session.send("   ").is_none());
        assert_eq!(session.messages().len(), 1);
        assert!(session.provider.seen.is_empty());
    }
}
