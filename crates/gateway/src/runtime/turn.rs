//! One conversational turn, end to end.
//!
//! [`process_message`] is the embeddable entry point; the HTTP API and
//! the REPL are thin wrappers around it. Model and dispatch failures
//! never escape as errors: every outcome becomes a user-presentable
//! [`Reply`]. Only session-store I/O propagates to the caller.

use serde_json::json;
use tracing::Instrument;

use tt_domain::error::Result;
use tt_domain::message::Role;
use tt_domain::operation::ArgMap;
use tt_domain::response::{ModelResponse, Reply, ReplyKind};
use tt_registry::OpContext;
use tt_sessions::Session;

use crate::state::AppState;

use super::model_gateway::ModelGateway;

/// Messages that clear the conversation without consulting the model.
const SPECIAL_COMMANDS: [&str; 6] = [
    "cancel",
    "reset",
    "clear",
    "start over",
    "nevermind",
    "forget it",
];

const CLEARED_REPLY: &str = "Conversation cleared. What would you like to do?";
const EXHAUSTED_REPLY: &str = "Sorry, I'm having trouble right now. Please try again.";

/// Input to a single turn.
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub session_id: String,
    pub owner_id: i64,
    pub restaurant_id: i64,
    pub message: String,
}

/// Run one turn: load the session, consult the model, advance the
/// collection state, dispatch when ready, persist.
pub async fn process_message(state: &AppState, input: TurnInput) -> Result<Reply> {
    let span = tracing::info_span!(
        "turn",
        session_id = %input.session_id,
        turn_id = %uuid::Uuid::new_v4(),
    );
    process_inner(state, input).instrument(span).await
}

async fn process_inner(state: &AppState, input: TurnInput) -> Result<Reply> {
    let mut session = match state.sessions.load(&input.session_id)? {
        Some(session) => session,
        None => {
            state
                .sessions
                .create_idle(&input.session_id, input.owner_id, input.restaurant_id)?
        }
    };

    let reply = if is_special_command(&input.message) {
        tracing::info!("conversation cleared by user command");
        session.reset_to_idle();
        Reply::result(CLEARED_REPLY, None)
    } else {
        // The prompt sees the history as it was before this message; the
        // message itself rides along as the final user line.
        let gateway = ModelGateway::new(state.transport.clone(), state.config.model.max_attempts);
        let outcome = gateway
            .get_response(
                &state.registry,
                &session,
                &input.message,
                session.current_operation.as_deref(),
            )
            .await;

        match outcome {
            Ok(ModelResponse::AskUser {
                message,
                current_operation,
                partial_arguments,
                ..
            }) => {
                // The ask names an operation itself or inherits the one
                // already being collected. Neither: pure clarification,
                // collection state untouched.
                let effective = current_operation.or_else(|| session.current_operation.clone());
                match effective.as_deref().and_then(|n| state.registry.get_spec(n)) {
                    Some(spec) => {
                        // Context supplies restaurant_id; the user is
                        // never asked for it.
                        let mut partials = partial_arguments;
                        if spec.declares("restaurant_id")
                            && !partials.contains_key("restaurant_id")
                        {
                            partials.insert("restaurant_id".into(), json!(session.restaurant_id));
                        }
                        session.merge_partials(spec, &partials);
                        Reply::ask(
                            message,
                            Some(spec.name.clone()),
                            session.missing_fields.clone(),
                        )
                    }
                    None => Reply::ask(message, None, Vec::new()),
                }
            }
            Ok(ModelResponse::CallOperation { name, arguments }) => {
                run_operation(state, &mut session, name, arguments).await
            }
            Err(e) => {
                tracing::error!(error = %e, "turn abandoned, model gateway exhausted");
                Reply::error(EXHAUSTED_REPLY)
            }
        }
    };

    session.push_history(Role::User, input.message.as_str());
    session.push_history(Role::Assistant, reply.text.as_str());
    state.sessions.save(&session)?;
    Ok(reply)
}

/// Merge the call with collected state, dispatch, and settle the session.
async fn run_operation(
    state: &AppState,
    session: &mut Session,
    name: String,
    call_arguments: ArgMap,
) -> Reply {
    // A call for the operation already being collected extends it; a call
    // for anything else is a topic switch and the old partials are dropped.
    let mut merged = if session.current_operation.as_deref() == Some(name.as_str()) {
        let mut merged = session.collected_arguments.clone();
        for (key, value) in call_arguments {
            merged.insert(key, value);
        }
        merged
    } else {
        call_arguments
    };

    if let Some(spec) = state.registry.get_spec(&name) {
        if spec.declares("restaurant_id") && !merged.contains_key("restaurant_id") {
            merged.insert("restaurant_id".into(), json!(session.restaurant_id));
        }
    }

    let ctx = OpContext {
        owner_id: session.owner_id,
        restaurant_id: session.restaurant_id,
    };

    match state.registry.dispatch(&name, &ctx, &merged).await {
        Ok(text) => {
            tracing::info!(operation = %name, "operation completed");
            session.reset_to_idle();
            Reply::result(text, Some(name))
        }
        Err(e) => {
            // Incomplete arguments or a handler refusal: progress survives,
            // the user supplies what is missing or corrects a value.
            tracing::warn!(operation = %name, error = %e, "operation did not run");
            if let Some(spec) = state.registry.get_spec(&name) {
                session.set_collecting(spec, merged);
            }
            Reply {
                text: e.to_string(),
                kind: ReplyKind::Error,
                operation: Some(name),
                missing_fields: Vec::new(),
            }
        }
    }
}

fn is_special_command(message: &str) -> bool {
    let normalized = message.trim().to_lowercase();
    SPECIAL_COMMANDS.contains(&normalized.as_str())
}
