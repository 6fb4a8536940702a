//! Message types for the loop state.
//!
//! Message roles: System (usually first in the list), User, Assistant, Tool.
//! Assistant messages may carry requested tool calls; Tool messages answer one
//! call and carry its id in `tool_call_id`. Used by `LoopState::messages` and
//! by every step that reads or appends history.

use serde::{Deserialize, Serialize};

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System prompt; typically placed first in the message list.
    System,
    /// User input.
    User,
    /// Model reply; may request tool calls.
    Assistant,
    /// Result of one tool call; `tool_call_id` names the call it answers.
    Tool,
}

/// A single tool invocation requested by the model and executed by the tool step.
///
/// `arguments` is the raw JSON text produced by the model; it is parsed
/// leniently at execution time (see the tool step).
///
/// **Interaction**: written into an Assistant [`Message`] by the model step;
/// read by the tool step to call `ToolSource::call_tool(name, arguments)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call identifier; tool results are tagged with it.
    pub id: String,
    /// Tool name as registered in the tool source.
    pub name: String,
    /// Arguments as JSON text.
    pub arguments: String,
}

/// A single message in the conversation.
///
/// One immutable turn: role plus content, and for Assistant turns the list of
/// requested tool calls. Tool turns answer exactly one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of this turn.
    pub role: Role,
    /// Textual content; may be empty on an assistant turn with only tool calls.
    pub content: String,
    /// Tool calls requested by an assistant turn; empty for all other roles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For Tool turns, the id of the call this result answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            tool_calls: vec![],
            tool_call_id: None,
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: vec![],
            tool_call_id: None,
        }
    }

    /// Creates an assistant message with no tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::assistant_with_tool_calls(content, vec![])
    }

    /// Creates an assistant message carrying requested tool calls.
    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
            tool_call_id: None,
        }
    }

    /// Creates a tool-result message answering the call with `call_id`.
    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: vec![],
            tool_call_id: Some(call_id.into()),
        }
    }

    /// True when this is an assistant turn that requests at least one tool call.
    pub fn has_tool_calls(&self) -> bool {
        self.role == Role::Assistant && !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: constructors produce the correct role and content.
    #[test]
    fn message_constructors_set_role_and_content() {
        let sys = Message::system("s");
        assert_eq!(sys.role, Role::System);
        assert_eq!(sys.content, "s");
        let usr = Message::user("u");
        assert_eq!(usr.role, Role::User);
        let ast = Message::assistant("a");
        assert_eq!(ast.role, Role::Assistant);
        assert!(ast.tool_calls.is_empty());
        let tool = Message::tool("call-1", "12:00");
        assert_eq!(tool.role, Role::Tool);
        assert_eq!(tool.tool_call_id.as_deref(), Some("call-1"));
    }

    /// **Scenario**: has_tool_calls is true only for assistant turns with calls.
    #[test]
    fn message_has_tool_calls_only_for_assistant_requests() {
        let plain = Message::assistant("done");
        assert!(!plain.has_tool_calls());
        let with_calls = Message::assistant_with_tool_calls(
            "",
            vec![ToolCall {
                id: "c1".into(),
                name: "get_time".into(),
                arguments: "{}".into(),
            }],
        );
        assert!(with_calls.has_tool_calls());
        let tool = Message::tool("c1", "12:00");
        assert!(!tool.has_tool_calls());
    }

    /// **Scenario**: each Message shape round-trips through serde.
    #[test]
    fn message_serialize_deserialize_roundtrip() {
        for msg in [
            Message::system("sys"),
            Message::user("usr"),
            Message::assistant_with_tool_calls(
                "calling",
                vec![ToolCall {
                    id: "c1".into(),
                    name: "search".into(),
                    arguments: r#"{"q":"weather"}"#.into(),
                }],
            ),
            Message::tool("c1", "sunny"),
        ] {
            let json = serde_json::to_string(&msg).expect("serialize");
            let back: Message = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(msg.role, back.role);
            assert_eq!(msg.content, back.content);
            assert_eq!(msg.tool_calls.len(), back.tool_calls.len());
            assert_eq!(msg.tool_call_id, back.tool_call_id);
        }
    }
}
