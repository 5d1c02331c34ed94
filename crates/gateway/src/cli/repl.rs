//! `tabletalk chat` — interactive REPL command.
//!
//! Runs the conversation engine in-process, no HTTP server involved.
//! Each line goes through the same [`process_message`] path the API
//! uses; slash-commands handle session management locally.

use std::sync::Arc;

use tt_domain::config::Config;
use tt_domain::response::ReplyKind;

use crate::bootstrap;
use crate::runtime::{process_message, TurnInput};
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive chat REPL.
pub async fn run(
    config: Arc<Config>,
    session: Option<String>,
    owner_id: i64,
    restaurant_id: i64,
) -> anyhow::Result<()> {
    let state = bootstrap::build_app_state(config)?;

    let mut session_id = session
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    // Readline editor with persistent history.
    let history_path = dirs::home_dir()
        .unwrap_or_default()
        .join(".tabletalk")
        .join("chat_history.txt");
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    let _ = rl.load_history(&history_path);

    // Welcome goes to stderr; stdout stays clean for replies.
    eprintln!("TableTalk interactive chat");
    eprintln!(
        "Session: {session_id}  |  Restaurant: {restaurant_id}  |  \
         Type /help for commands, Ctrl+D to exit"
    );
    eprintln!();

    loop {
        let readline = rl.readline("you> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(&line).ok();

                // ── Slash commands ────────────────────────────────
                if trimmed.starts_with('/') {
                    if handle_slash_command(trimmed, &state, &mut session_id) {
                        break;
                    }
                    continue;
                }

                // ── User message → one turn ───────────────────────
                if let Err(e) =
                    send_message(&state, &session_id, owner_id, restaurant_id, trimmed).await
                {
                    eprintln!("\x1B[31merror: {e}\x1B[0m");
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                break;
            }
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    rl.save_history(&history_path).ok();

    // Flush stores before exit.
    state.sessions.flush().ok();
    state.restaurants.flush().ok();

    eprintln!("Goodbye!");
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process a slash command. Returns `true` if the REPL should exit.
fn handle_slash_command(input: &str, state: &AppState, session_id: &mut String) -> bool {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim());

    match cmd {
        "/exit" | "/quit" => return true,

        "/session" => {
            if let Some(name) = arg.filter(|s| !s.is_empty()) {
                *session_id = name.to_string();
                eprintln!("Session switched to: {session_id}");
            } else {
                eprintln!("Current session: {session_id}");
                eprintln!("Usage: /session <name>");
            }
        }

        "/state" => match state.sessions.load(session_id) {
            Ok(Some(session)) => {
                if session.is_collecting() {
                    eprintln!(
                        "Collecting for {}: have {}, still need {}",
                        session.current_operation.as_deref().unwrap_or("?"),
                        if session.collected_arguments.is_empty() {
                            "nothing yet".to_string()
                        } else {
                            session
                                .collected_arguments
                                .keys()
                                .cloned()
                                .collect::<Vec<_>>()
                                .join(", ")
                        },
                        session.missing_fields.join(", "),
                    );
                } else {
                    eprintln!("Idle, no operation in progress");
                }
            }
            Ok(None) => eprintln!("No session state yet (say something first)"),
            Err(e) => eprintln!("\x1B[31merror: {e}\x1B[0m"),
        },

        "/reset" => {
            *session_id = uuid::Uuid::new_v4().to_string();
            eprintln!("Fresh session: {session_id}");
        }

        "/clear" => {
            // ANSI escape: clear screen and move cursor to top-left.
            eprint!("\x1B[2J\x1B[1;1H");
        }

        "/help" => {
            eprintln!("Commands:");
            eprintln!("  /session <name>  Switch to a named session");
            eprintln!("  /state           Show what is being collected");
            eprintln!("  /reset           Start a fresh session (new ID)");
            eprintln!("  /clear           Clear the screen");
            eprintln!("  /exit, /quit     Exit the chat");
            eprintln!("  /help            Show this help");
            eprintln!();
            eprintln!("Plain \"cancel\" or \"reset\" clears the current operation in-band.");
        }

        other => {
            eprintln!("Unknown command: {other}  (type /help for a list)");
        }
    }

    false
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message sending
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

async fn send_message(
    state: &AppState,
    session_id: &str,
    owner_id: i64,
    restaurant_id: i64,
    user_message: &str,
) -> anyhow::Result<()> {
    let input = TurnInput {
        session_id: session_id.to_string(),
        owner_id,
        restaurant_id,
        message: user_message.to_string(),
    };

    let reply = process_message(state, input).await?;

    println!("{}", reply.text);
    println!();

    // Dim status line while an operation is mid-collection.
    if reply.kind == ReplyKind::Ask && !reply.missing_fields.is_empty() {
        if let Some(op) = &reply.operation {
            eprintln!(
                "\x1B[2m[{op}: still need {}]\x1B[0m",
                reply.missing_fields.join(", ")
            );
        }
    }

    Ok(())
}
