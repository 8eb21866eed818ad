// 助理只會提出地點名稱，不會直接改動清單；名稱須經 PlaceProvider 解析後才成為候選。

use crate::utils::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

pub const GREETING: &str =
    "Hello! I can help you plan your trip. Where would you like to go?";

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// 回覆的增量文字
    Message {
        answer: String,
        conversation_id: Option<String>,
    },
    MessageEnd {
        conversation_id: Option<String>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    event: String,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    conversation_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ChatEvent {
    /// Maps the JSON payload of one chat-messages stream event. Keep-alive
    /// and unknown event kinds map to `None`.
    pub fn from_data(data: &str) -> Result<Option<Self>> {
        if data.trim().is_empty() {
            return Ok(None);
        }

        let raw: RawEvent = serde_json::from_str(data)?;
        let event = match raw.event.as_str() {
            "message" | "agent_message" => ChatEvent::Message {
                answer: raw.answer.unwrap_or_default(),
                conversation_id: raw.conversation_id,
            },
            "message_end" => ChatEvent::MessageEnd {
                conversation_id: raw.conversation_id,
            },
            "error" => ChatEvent::Error {
                message: raw
                    .message
                    .unwrap_or_else(|| "unknown assistant error".to_string()),
            },
            other => {
                tracing::trace!("Ignoring stream event: {}", other);
                return Ok(None);
            }
        };
        Ok(Some(event))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub complete: bool,
    /// 串流中斷，`text` 只是部分回覆
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
}

/// One outgoing message plus the transcript that preceded it.
#[derive(Debug, Clone, Copy)]
pub struct ChatTurn<'a> {
    pub query: &'a str,
    pub conversation_id: Option<&'a str>,
    pub history: &'a [ChatMessage],
}

impl<'a> ChatTurn<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            conversation_id: None,
            history: &[],
        }
    }

    /// 只保留完整送達的訊息
    pub fn settled_history(&self) -> impl Iterator<Item = &'a ChatMessage> {
        let history = self.history;
        history
            .iter()
            .filter(|message| message.complete && !message.failed && !message.text.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    conversation_id: Option<String>,
    awaiting_reply: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                sender: Sender::Bot,
                text: GREETING.to_string(),
                complete: true,
                failed: false,
            }],
            conversation_id: None,
            awaiting_reply: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// 回覆串流中不接受新訊息
    pub fn is_ready(&self) -> bool {
        !self.awaiting_reply
    }

    /// Records the user's message and opens an empty bot reply.
    pub fn begin_turn(&mut self, query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Err(PlannerError::ValidationError {
                message: "Message cannot be empty".to_string(),
            });
        }
        if self.awaiting_reply {
            return Err(PlannerError::ValidationError {
                message: "The assistant is still replying".to_string(),
            });
        }

        self.messages.push(ChatMessage {
            sender: Sender::User,
            text: query.to_string(),
            complete: true,
            failed: false,
        });
        self.messages.push(ChatMessage {
            sender: Sender::Bot,
            text: String::new(),
            complete: false,
            failed: false,
        });
        self.awaiting_reply = true;
        Ok(())
    }

    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Message {
                answer,
                conversation_id,
            } => {
                self.remember_conversation(conversation_id);
                if let Some(reply) = self.open_reply() {
                    reply.text.push_str(&answer);
                }
            }
            ChatEvent::MessageEnd { conversation_id } => {
                self.remember_conversation(conversation_id);
                self.finish();
            }
            ChatEvent::Error { message } => {
                tracing::warn!("Assistant reported an error: {}", message);
                self.fail();
            }
        }
    }

    /// Marks the open reply complete. Also used when the stream closes
    /// without a `message_end` event.
    pub fn finish(&mut self) {
        if let Some(reply) = self.open_reply() {
            reply.complete = true;
        }
        self.awaiting_reply = false;
    }

    /// Ends the turn after a failed stream. An empty placeholder is removed;
    /// a partial reply is kept but stays incomplete and is flagged `failed`.
    pub fn fail(&mut self) {
        if self
            .messages
            .last()
            .is_some_and(|m| m.sender == Sender::Bot && !m.complete && m.text.is_empty())
        {
            self.messages.pop();
        } else if let Some(reply) = self.open_reply() {
            reply.failed = true;
        }
        self.awaiting_reply = false;
    }

    pub fn last_reply(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.sender == Sender::Bot)
    }

    fn open_reply(&mut self) -> Option<&mut ChatMessage> {
        self.messages
            .last_mut()
            .filter(|message| {
                message.sender == Sender::Bot && !message.complete && !message.failed
            })
    }

    fn remember_conversation(&mut self, conversation_id: Option<String>) {
        if let Some(id) = conversation_id.filter(|id| !id.is_empty()) {
            self.conversation_id = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_data() {
        let event =
            ChatEvent::from_data(r#"{"event": "message", "answer": "Asakusa", "conversation_id": "c-1"}"#)
                .unwrap();
        assert_eq!(
            event,
            Some(ChatEvent::Message {
                answer: "Asakusa".to_string(),
                conversation_id: Some("c-1".to_string())
            })
        );

        let end = ChatEvent::from_data(r#"{"event": "message_end"}"#).unwrap();
        assert_eq!(
            end,
            Some(ChatEvent::MessageEnd {
                conversation_id: None
            })
        );

        let error = ChatEvent::from_data(r#"{"event": "error"}"#).unwrap();
        assert_eq!(
            error,
            Some(ChatEvent::Error {
                message: "unknown assistant error".to_string()
            })
        );
    }

    #[test]
    fn test_event_from_data_ignores_pings() {
        assert_eq!(ChatEvent::from_data(r#"{"event": "ping"}"#).unwrap(), None);
        assert_eq!(ChatEvent::from_data("").unwrap(), None);
    }

    #[test]
    fn test_event_from_data_rejects_malformed_json() {
        let err = ChatEvent::from_data("{not json}").unwrap_err();
        assert!(matches!(err, PlannerError::SerializationError(_)));
    }

    #[test]
    fn test_conversation_turn() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.messages().len(), 1);

        conversation.begin_turn("Where should I eat?").unwrap();
        assert!(!conversation.is_ready());
        assert!(conversation.begin_turn("Hello?").is_err());

        conversation.apply(ChatEvent::Message {
            answer: "Try ".to_string(),
            conversation_id: Some("c-9".to_string()),
        });
        conversation.apply(ChatEvent::Message {
            answer: "Tsukiji.".to_string(),
            conversation_id: None,
        });
        conversation.apply(ChatEvent::MessageEnd {
            conversation_id: None,
        });

        assert!(conversation.is_ready());
        assert_eq!(conversation.conversation_id(), Some("c-9"));
        let reply = conversation.last_reply().unwrap();
        assert_eq!(reply.text, "Try Tsukiji.");
        assert!(reply.complete);
    }

    #[test]
    fn test_conversation_rejects_blank_and_recovers_from_failure() {
        let mut conversation = Conversation::new();
        assert!(conversation.begin_turn("   ").is_err());

        conversation.begin_turn("Hi").unwrap();
        conversation.fail();
        assert!(conversation.is_ready());
        // 使用者訊息保留，空白回覆被移除
        assert_eq!(conversation.messages().len(), 2);
        assert_eq!(conversation.messages()[1].sender, Sender::User);
    }

    #[test]
    fn test_error_after_partial_reply_is_not_complete() {
        let mut conversation = Conversation::new();
        conversation.begin_turn("Hi").unwrap();
        conversation.apply(ChatEvent::Message {
            answer: "Visit Sen".to_string(),
            conversation_id: None,
        });
        conversation.apply(ChatEvent::Error {
            message: "quota".to_string(),
        });

        assert!(conversation.is_ready());
        let reply = conversation.last_reply().unwrap();
        assert_eq!(reply.text, "Visit Sen");
        assert!(!reply.complete);
        assert!(reply.failed);

        // 之後的 finish 也不會把中斷的回覆標成完成
        conversation.finish();
        assert!(!conversation.last_reply().unwrap().complete);

        conversation.begin_turn("Again?").unwrap();
        assert_eq!(conversation.messages().len(), 5);
    }
}
