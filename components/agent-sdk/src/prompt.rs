//! Prompt construction for the mentor persona.

use crate::engine::Transcript;
use crate::tools::ToolRegistry;
use std::borrow::Cow;

/// Default instructions. Placeholders: `{tools}`, `{tool_names}`, `{input}`
/// and `{agent_scratchpad}`.
pub const MENTOR_TEMPLATE: &str = r"Bạn là AI Mentor, một trợ lý học tập thông minh. Mục tiêu của bạn là trả lời câu hỏi của người dùng bằng tiếng Việt.
Bạn có quyền truy cập vào các công cụ sau đây:

{tools}
Để sử dụng một công cụ, bạn PHẢI tuân thủ nghiêm ngặt định dạng sau:
```
Thought: Suy nghĩ của bạn về việc có cần sử dụng công cụ hay không.
Action: Tên của công cụ cần dùng, PHẢI là MỘT trong các tên sau: [{tool_names}].
Action Input: Đầu vào cho công cụ.
Observation: Kết quả trả về từ công cụ.
```
Khi bạn đã có đủ thông tin, hãy dùng định dạng sau:
```
Thought: Bây giờ tôi đã có đủ thông tin để đưa ra câu trả lời cuối cùng.
Final Answer: [Câu trả lời cuối cùng của bạn ở đây]
```
Bắt đầu nào!

Question: {input}
{agent_scratchpad}Thought:";

/// Builds the prompt sent to the model on every iteration.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: Cow<'static, str>,
}

impl PromptBuilder {
    /// Creates a builder using [`MENTOR_TEMPLATE`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            template: Cow::Borrowed(MENTOR_TEMPLATE),
        }
    }

    /// Replaces the instruction template.
    #[must_use]
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: Cow::Owned(template.into()),
        }
    }

    /// Renders the prompt for `question` given the transcript so far.
    ///
    /// Placeholders are substituted in a single pass, so braces inside the
    /// question or tool output are left untouched.
    #[must_use]
    pub fn render(&self, question: &str, tools: &ToolRegistry, transcript: &Transcript) -> String {
        let tool_names = tools.names().join(", ");
        let tool_text = tools.help_text();
        let scratchpad = transcript.render();

        fill(
            &self.template,
            &[
                ("tools", tool_text.as_str()),
                ("tool_names", tool_names.as_str()),
                ("input", question),
                ("agent_scratchpad", scratchpad.as_str()),
            ],
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
