use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub conversation_history: &'a [ChatTurn],
}

impl<'a> ChatRequest<'a> {
    /// Only the trailing `max_turns` of the history travel with the message.
    pub fn new(message: &'a str, history: &'a [ChatTurn], max_turns: usize) -> Self {
        let start = history.len().saturating_sub(max_turns);
        Self {
            message,
            conversation_history: &history[start..],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_keeps_only_trailing_turns() {
        let history: Vec<ChatTurn> = (0..9).map(|i| ChatTurn::user(format!("m{i}"))).collect();
        let req = ChatRequest::new("hi", &history, 6);

        assert_eq!(req.conversation_history.len(), 6);
        assert_eq!(req.conversation_history[0].content, "m3");

        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["message"], "hi");
        assert_eq!(body["conversation_history"][5]["role"], "user");
    }

    #[test]
    fn short_history_is_sent_whole() {
        let history = vec![ChatTurn::user("a"), ChatTurn::assistant("b")];
        assert_eq!(ChatRequest::new("c", &history, 6).conversation_history.len(), 2);
    }
}
