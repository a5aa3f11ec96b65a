//! Action parser turning a model completion into a [`ParsedOutput`].
//!
//! The expected grammar is
//!
//! ```text
//! Thought: ...
//! Action: <tool name>
//! Action Input: <input>
//! ```
//!
//! or
//!
//! ```text
//! Thought: ...
//! Final Answer: <answer>
//! ```
//!
//! A final answer wins over action markers found in the same completion.
//! Parsing is a pure function of the text.

use crate::error::ParseError;
use crate::types::{Action, ParsedOutput};
use regex::Regex;
use std::sync::LazyLock;

/// Matches `Final Answer:`.
static FINAL_ANSWER: LazyLock<Regex> = LazyLock::new(|| compile(r"Final\s*Answer\s*:"));

/// Matches `Action: name ... Action Input: input`.
static ACTION_WITH_INPUT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?s)Action\s*\d*\s*:(?P<tool>.*?)Action\s*\d*\s*Input\s*\d*\s*:(?P<input>.*)")
});

/// Matches a lone `Action:` line.
static ACTION_ONLY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Action\s*\d*\s*:[ \t]*(?P<tool>[^\n]*)"));

/// Matches any marker that may follow an action input.
static INPUT_END: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^\s*(?:Observation|Thought|Final\s*Answer|Action(?:\s*\d*\s*Input)?\s*\d*)\s*:")
});

/// Matches the first marker of any kind, used to delimit the thought.
static FIRST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?:Final\s*Answer|Action\s*\d*)\s*:"));

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => panic!("action parser pattern should be valid: {e}"),
    }
}

/// Parser for the model's response grammar.
pub struct ActionParser;

impl ActionParser {
    /// Parses a completion into a continue or final variant.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when no marker is recognizable or a marker
    /// is left empty. The parser never guesses.
    pub fn parse(text: &str) -> Result<ParsedOutput, ParseError> {
        let thought = Self::thought(text);

        if let Some(marker) = FINAL_ANSWER.find(text) {
            let answer = text[marker.end()..].trim();
            if answer.is_empty() {
                return Err(ParseError::EmptyAnswer);
            }
            return Ok(ParsedOutput::Final {
                thought,
                answer: answer.to_string(),
            });
        }

        if let Some(caps) = ACTION_WITH_INPUT.captures(text) {
            let tool = caps
                .name("tool")
                .map(|m| Self::tool_name(m.as_str()))
                .unwrap_or_default();
            if tool.is_empty() {
                return Err(ParseError::EmptyAction);
            }
            let input = caps
                .name("input")
                .map(|m| Self::action_input(m.as_str()))
                .unwrap_or_default();
            return Ok(ParsedOutput::Continue {
                thought,
                action: Action::new(tool, input),
            });
        }

        if let Some(caps) = ACTION_ONLY.captures(text) {
            let tool = caps
                .name("tool")
                .map(|m| Self::tool_name(m.as_str()))
                .unwrap_or_default();
            if tool.is_empty() {
                return Err(ParseError::EmptyAction);
            }
            return Err(ParseError::MissingActionInput { tool });
        }

        Err(ParseError::MissingMarkers)
    }

    /// Text before the first marker, without a leading `Thought:`.
    fn thought(text: &str) -> String {
        let head = FIRST_MARKER
            .find(text)
            .map_or(text, |marker| &text[..marker.start()]);
        let head = head.trim();
        head.strip_prefix("Thought:")
            .unwrap_or(head)
            .trim()
            .to_string()
    }

    /// First non-empty line of the captured name, without decoration.
    fn tool_name(raw: &str) -> String {
        raw.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .trim_matches(|c: char| c == '`' || c == '*' || c == '"' || c == '\'')
            .trim()
            .to_string()
    }

    /// Input up to the next marker or end of text.
    fn action_input(raw: &str) -> String {
        let end = INPUT_END.find(raw).map_or(raw.len(), |m| m.start());
        let input = raw[..end].trim();
        input
            .strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
            .unwrap_or(input)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn continue_action(text: &str) -> Action {
        match ActionParser::parse(text) {
            Ok(ParsedOutput::Continue { action, .. }) => action,
            other => panic!("Expected Continue, got {other:?}"),
        }
    }

    #[test]
    fn test_final_answer() {
        let parsed = ActionParser::parse(
            "Thought: Bây giờ tôi đã có đủ thông tin.\nFinal Answer: Hà Nội",
        )
        .unwrap();
        assert_eq!(
            parsed,
            ParsedOutput::Final {
                thought: "Bây giờ tôi đã có đủ thông tin.".to_string(),
                answer: "Hà Nội".to_string(),
            }
        );
    }

    #[test]
    fn test_final_answer_keeps_multiline_text() {
        let parsed = ActionParser::parse("Final Answer: Dòng 1\nDòng 2\n").unwrap();
        assert!(matches!(
            parsed,
            ParsedOutput::Final { answer, .. } if answer == "Dòng 1\nDòng 2"
        ));
    }

    #[test]
    fn test_final_answer_takes_precedence() {
        let text = "Thought: xong\nAction: Flashcard_Manager\nAction Input: {}\nFinal Answer: 42";
        let first = ActionParser::parse(text).unwrap();
        let second = ActionParser::parse(text).unwrap();

        assert!(matches!(&first, ParsedOutput::Final { answer, .. } if answer == "42"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_action_with_input() {
        let action = continue_action(
            "Thought: Tôi cần xem lịch.\nAction: Google_Calendar_Reader\nAction Input: 7",
        );
        assert_eq!(action, Action::new("Google_Calendar_Reader", "7"));
    }

    #[test]
    fn test_action_input_stops_at_next_marker() {
        let action = continue_action(
            "Action: Study_Material_Searcher\nAction Input: tích phân lớp 12\nObservation: (bịa)\nThought: ...",
        );
        assert_eq!(action.input, "tích phân lớp 12");
    }

    #[test]
    fn test_action_input_keeps_json_verbatim() {
        let action = continue_action(
            "Action: Flashcard_Manager\nAction Input: {\"action\": \"get\", \"topic\": \"Toán\"}\n",
        );
        assert_eq!(action.input, r#"{"action": "get", "topic": "Toán"}"#);
    }

    #[test]
    fn test_action_input_multiline_payload() {
        let action = continue_action(
            "Action: Flashcard_Manager\nAction Input: Đây là JSON:\n{\n  \"action\": \"list_topics\"\n}",
        );
        assert!(action.input.starts_with("Đây là JSON:"));
        assert!(action.input.ends_with('}'));
    }

    #[test]
    fn test_action_name_decorations_are_stripped() {
        let action = continue_action("Action: `Flashcard_Manager`\nAction Input: \"x\"");
        assert_eq!(action, Action::new("Flashcard_Manager", "x"));
    }

    #[test]
    fn test_missing_markers() {
        assert_eq!(
            ActionParser::parse("Tôi nghĩ câu trả lời là 5."),
            Err(ParseError::MissingMarkers)
        );
    }

    #[test]
    fn test_missing_action_input() {
        assert_eq!(
            ActionParser::parse("Thought: hmm\nAction: Google_Calendar_Reader\n"),
            Err(ParseError::MissingActionInput {
                tool: "Google_Calendar_Reader".to_string()
            })
        );
    }

    #[test]
    fn test_empty_markers() {
        assert_eq!(
            ActionParser::parse("Final Answer:   "),
            Err(ParseError::EmptyAnswer)
        );
        assert_eq!(
            ActionParser::parse("Action:\nAction Input: 3"),
            Err(ParseError::EmptyAction)
        );
    }
}
