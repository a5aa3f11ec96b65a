//! The `Flashcard_Manager` tool.
//!
//! Input is a JSON object, possibly wrapped in prose or code fences:
//! `{"action": "add" | "get" | "list_topics", "topic": .., "front": .., "back": ..}`.

mod store;

pub use store::{Deck, Flashcard, FlashcardStore, StoreError};

use mentor_sdk::tools::constants::FLASHCARDS;
use mentor_sdk::{PayloadError, Tool, ToolError, decode_payload};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::Path;

const DESCRIPTION: &str = r#"Công cụ để quản lý thẻ ghi nhớ. Hữu ích để thêm, xem lại, hoặc liệt kê các thẻ ghi nhớ.
Đầu vào PHẢI là một chuỗi JSON hợp lệ.
Ví dụ:
- Để thêm thẻ: {"action": "add", "topic": "Tên chủ đề", "front": "Nội dung mặt trước", "back": "Nội dung mặt sau"}
- Để xem thẻ: {"action": "get", "topic": "Tên chủ đề"}
- Để liệt kê chủ đề: {"action": "list_topics"}"#;

/// Raw request as written by the model.
#[derive(Debug, Deserialize)]
struct FlashcardRequest {
    #[serde(deserialize_with = "scalar_text")]
    action: String,
    #[serde(default, deserialize_with = "scalar_text")]
    topic: String,
    #[serde(default, deserialize_with = "scalar_text")]
    front: String,
    #[serde(default, deserialize_with = "scalar_text")]
    back: String,
}

/// Accepts any JSON scalar as text; `null` reads as empty.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(D::Error::custom(
            "các trường action, topic, front, back phải là chuỗi",
        )),
    }
}

/// A validated flashcard operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashcardCommand {
    /// Append a card to a topic.
    Add {
        /// Topic to append to.
        topic: String,
        /// The card.
        card: Flashcard,
    },
    /// List the cards of a topic.
    Get {
        /// Topic to read.
        topic: String,
    },
    /// List every topic.
    ListTopics,
}

impl FlashcardCommand {
    fn from_request(req: FlashcardRequest) -> Result<Self, ToolError> {
        let trimmed = |s: String| s.trim().to_string();

        match req.action.trim() {
            "add" => {
                let (topic, front, back) = (trimmed(req.topic), trimmed(req.front), trimmed(req.back));
                if topic.is_empty() || front.is_empty() || back.is_empty() {
                    return Err(ToolError::invalid(
                        FLASHCARDS,
                        "Để thêm thẻ, cần cung cấp đủ topic, front, và back.",
                    ));
                }
                Ok(Self::Add {
                    topic,
                    card: Flashcard { front, back },
                })
            }
            "get" => {
                let topic = trimmed(req.topic);
                if topic.is_empty() {
                    return Err(ToolError::invalid(
                        FLASHCARDS,
                        "Cần cung cấp topic để lấy thẻ ghi nhớ.",
                    ));
                }
                Ok(Self::Get { topic })
            }
            "list_topics" => Ok(Self::ListTopics),
            other => Err(ToolError::invalid(
                FLASHCARDS,
                format!(
                    "Hành động '{other}' không được hỗ trợ. Chỉ có thể dùng 'add', 'get', 'list_topics'."
                ),
            )),
        }
    }

    /// Decodes and validates the raw tool input.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] when no JSON object is found,
    /// the object has the wrong shape, or required fields are missing.
    pub fn parse(input: &str) -> Result<Self, ToolError> {
        let request: FlashcardRequest = decode_payload(input).map_err(|e| match e {
            PayloadError::NotFound => {
                ToolError::invalid(FLASHCARDS, "đầu vào phải là một chuỗi JSON hợp lệ")
            }
            PayloadError::Invalid(e) => {
                ToolError::invalid(FLASHCARDS, format!("JSON không đúng cấu trúc yêu cầu: {e}"))
            }
        })?;
        Self::from_request(request)
    }
}

/// Manages flashcards grouped by topic.
#[derive(Debug)]
pub struct FlashcardTool {
    store: FlashcardStore,
}

impl FlashcardTool {
    /// Creates the tool over the deck stored at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            store: FlashcardStore::new(path),
        }
    }

    /// Runs a validated command against the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn execute(&self, command: FlashcardCommand) -> Result<String, ToolError> {
        let store_err = |e: StoreError| ToolError::execution(FLASHCARDS, e);

        match command {
            FlashcardCommand::Add { topic, card } => {
                self.store.add(&topic, card).map_err(store_err)?;
                Ok(format!("Đã thêm thành công thẻ ghi nhớ vào chủ đề '{topic}'."))
            }
            FlashcardCommand::Get { topic } => {
                let cards = self.store.cards(&topic).map_err(store_err)?;
                if cards.is_empty() {
                    return Ok(format!(
                        "Không tìm thấy thẻ ghi nhớ nào cho chủ đề '{topic}'."
                    ));
                }

                let mut out = format!("Các thẻ ghi nhớ cho chủ đề '{topic}':\n");
                for (i, card) in cards.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "{}. Mặt trước: {} | Mặt sau: {}",
                        i + 1,
                        card.front,
                        card.back
                    );
                }
                Ok(out)
            }
            FlashcardCommand::ListTopics => {
                let topics = self.store.topics().map_err(store_err)?;
                if topics.is_empty() {
                    return Ok("Bạn chưa có chủ đề thẻ ghi nhớ nào.".to_string());
                }
                Ok(format!(
                    "Các chủ đề thẻ ghi nhớ bạn đang có: {}",
                    topics.join(", ")
                ))
            }
        }
    }
}

impl Tool for FlashcardTool {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(FLASHCARDS)
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed(DESCRIPTION)
    }

    fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let command = FlashcardCommand::parse(input)?;
        self.execute(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tool() -> (TempDir, FlashcardTool) {
        let dir = TempDir::new().unwrap();
        let tool = FlashcardTool::new(dir.path().join("flashcards.json"));
        (dir, tool)
    }

    #[test]
    fn test_add_then_get() {
        let (_dir, tool) = tool();

        let out = tool
            .invoke(r#"{"action": "add", "topic": "Toán", "front": "2+2", "back": "4"}"#)
            .unwrap();
        assert_eq!(out, "Đã thêm thành công thẻ ghi nhớ vào chủ đề 'Toán'.");

        let out = tool.invoke(r#"{"action": "get", "topic": "Toán"}"#).unwrap();
        assert_eq!(
            out,
            "Các thẻ ghi nhớ cho chủ đề 'Toán':\n1. Mặt trước: 2+2 | Mặt sau: 4\n"
        );
    }

    #[test]
    fn test_get_unknown_topic_is_not_an_error() {
        let (_dir, tool) = tool();
        let out = tool.invoke(r#"{"action":"get","topic":"Toán"}"#).unwrap();
        assert_eq!(out, "Không tìm thấy thẻ ghi nhớ nào cho chủ đề 'Toán'.");
    }

    #[test]
    fn test_list_topics() {
        let (_dir, tool) = tool();
        assert_eq!(
            tool.invoke(r#"{"action": "list_topics"}"#).unwrap(),
            "Bạn chưa có chủ đề thẻ ghi nhớ nào."
        );

        tool.invoke(r#"{"action": "add", "topic": "Vật lý", "front": "F", "back": "ma"}"#)
            .unwrap();
        tool.invoke(r#"{"action": "add", "topic": "Hóa học", "front": "H2O", "back": "Nước"}"#)
            .unwrap();

        assert_eq!(
            tool.invoke(r#"{"action": "list_topics"}"#).unwrap(),
            "Các chủ đề thẻ ghi nhớ bạn đang có: Vật lý, Hóa học"
        );
    }

    #[test]
    fn test_scalar_fields_are_accepted_as_text() {
        let (_dir, tool) = tool();
        tool.invoke(r#"{"action": "add", "topic": "Toán", "front": "2+2", "back": 4}"#)
            .unwrap();

        let out = tool.invoke(r#"{"action": "get", "topic": "Toán"}"#).unwrap();
        assert!(out.contains("1. Mặt trước: 2+2 | Mặt sau: 4"));

        let err = FlashcardCommand::parse(r#"{"action": "get", "topic": null}"#).unwrap_err();
        assert!(err.to_string().contains("Cần cung cấp topic"));
    }

    #[test]
    fn test_structured_field_names_the_problem() {
        let err = FlashcardCommand::parse(
            r#"{"action": "add", "topic": "Toán", "front": ["a"], "back": "b"}"#,
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("JSON không đúng cấu trúc"));
        assert!(msg.contains("phải là chuỗi"));
        assert!(!msg.contains("chuỗi JSON hợp lệ"));
    }

    #[test]
    fn test_template_braces_before_payload() {
        let (_dir, tool) = tool();
        let out = tool
            .invoke(r#"Dùng mẫu {topic}: {"action": "list_topics"}"#)
            .unwrap();
        assert_eq!(out, "Bạn chưa có chủ đề thẻ ghi nhớ nào.");
    }

    #[test]
    fn test_payload_wrapped_in_prose() {
        let (_dir, tool) = tool();
        let input = "Đây là JSON:\n```json\n{\"action\": \"list_topics\"}\n```";
        assert!(tool.invoke(input).is_ok());
    }

    #[test]
    fn test_add_missing_fields() {
        let (_dir, tool) = tool();
        let err = tool
            .invoke(r#"{"action": "add", "topic": "Toán", "front": "2+2"}"#)
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert!(err.to_string().contains("topic, front, và back"));
    }

    #[test]
    fn test_unknown_action_names_supported_actions() {
        let (_dir, tool) = tool();
        let err = tool.invoke(r#"{"action": "delete"}"#).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'delete'"));
        assert!(msg.contains("'add', 'get', 'list_topics'"));
    }

    #[test]
    fn test_non_json_input() {
        let (_dir, tool) = tool();
        let err = tool.invoke("thêm thẻ về Toán").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert!(err.to_string().contains("chuỗi JSON hợp lệ"));
    }

    #[test]
    fn test_missing_action_field() {
        assert!(FlashcardCommand::parse(r#"{"topic": "Toán"}"#).is_err());
    }

    #[test]
    fn test_parse_trims_fields() {
        let cmd = FlashcardCommand::parse(r#"{"action": " get ", "topic": " Toán "}"#).unwrap();
        assert_eq!(
            cmd,
            FlashcardCommand::Get {
                topic: "Toán".to_string()
            }
        );
    }
}
