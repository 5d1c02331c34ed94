//! Message assembly for one model call.
//!
//! Order: behavioral instructions, the operation catalog, serialized
//! session state, rolling history, the user's message, and (on gateway
//! retries only) a corrective note describing the previous violation.

use tt_domain::error::Error;
use tt_domain::message::{ChatMessage, Role};
use tt_domain::operation::OperationSpec;
use tt_sessions::session::{Session, SessionStatus};

/// Behavioral instructions: the response contract and slot-filling rules.
const INSTRUCTIONS: &str = "\
You are TableTalk, an assistant that helps restaurant owners change their \
restaurant's settings through conversation.

You MUST reply with exactly one JSON object and nothing else. Two shapes \
are allowed:

1. When you still need information before an operation can run:
{\"type\": \"ask_user\", \"message\": \"<question for the user>\", \
\"current_operation\": \"<operation name, or null if none identified>\", \
\"partial_arguments\": {<arguments extracted so far>}, \
\"missing_fields\": [<required argument names you still need>]}

2. When every required argument of an operation is known:
{\"type\": \"call_operation\", \"name\": \"<operation name>\", \
\"arguments\": {<all arguments>}}

Rules:
- Use only operation names and argument names listed under AVAILABLE \
OPERATIONS, with values of the declared types.
- The system supplies restaurant_id automatically. Never ask the user \
for it.
- Extract every argument value the user's message already contains into \
partial_arguments, even when you still have to ask for others.
- Continue from CURRENT SESSION STATE: arguments already collected stay \
collected, so ask only for what is missing.
- While collecting for an operation, keep current_operation unchanged. \
To do something different, reply with call_operation for the new \
operation instead.
- Never invent argument values the user did not give you.";

/// Build the full message list for one model call.
pub fn build_messages<'a>(
    ops: impl IntoIterator<Item = &'a OperationSpec>,
    session: &Session,
    user_message: &str,
    corrective_note: Option<&str>,
) -> Vec<ChatMessage> {
    let mut messages = Vec::new();

    messages.push(ChatMessage::system(INSTRUCTIONS));
    messages.push(ChatMessage::system(format!(
        "AVAILABLE OPERATIONS:\n\n{}",
        render_operations(ops)
    )));
    messages.push(ChatMessage::system(render_session(session)));

    for entry in &session.history {
        let message = match entry.role {
            Role::Assistant => ChatMessage::assistant(entry.text.clone()),
            _ => ChatMessage::user(entry.text.clone()),
        };
        messages.push(message);
    }

    messages.push(ChatMessage::user(user_message));

    // Only the most recent violation is carried; notes never stack.
    if let Some(note) = corrective_note {
        messages.push(ChatMessage::system(note.to_owned()));
    }

    messages
}

/// The note appended after a rejected attempt, naming the exact violation.
pub fn corrective_note_for(error: &Error) -> String {
    format!(
        "Your previous reply was rejected: {error}. Reply again with \
         exactly one JSON object using one of the two allowed shapes, and \
         fix this mistake."
    )
}

fn render_operations<'a>(ops: impl IntoIterator<Item = &'a OperationSpec>) -> String {
    let specs: Vec<String> = ops
        .into_iter()
        .map(|op| {
            format!(
                "Operation: {}\nDescription: {}\nParameters: {}\n",
                op.name,
                op.description,
                serde_json::to_string_pretty(&op.schema_json())
                    .unwrap_or_else(|_| "{}".into()),
            )
        })
        .collect();
    specs.join("\n---\n")
}

fn render_session(session: &Session) -> String {
    let collected = serde_json::to_string_pretty(&session.collected_arguments)
        .unwrap_or_else(|_| "{}".into());
    format!(
        "CURRENT SESSION STATE:\n\
         Current Operation: {}\n\
         Collected Arguments: {}\n\
         Missing Fields: [{}]\n\
         Status: {}",
        session.current_operation.as_deref().unwrap_or("None"),
        collected,
        session.missing_fields.join(", "),
        match session.status {
            SessionStatus::Idle => "idle",
            SessionStatus::Collecting => "collecting",
        },
    )
}
