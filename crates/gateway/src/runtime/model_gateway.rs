//! Retrying model gateway.
//!
//! Wraps a [`ModelTransport`] with the attempt loop: build the prompt,
//! send, validate the reply against the response contract. Contract
//! violations earn a corrective note appended to the next attempt's
//! prompt; transport failures are retried with the prompt unchanged.
//! Only the most recent note is ever carried.

use std::sync::Arc;

use tt_domain::error::{Error, Result};
use tt_domain::response::ModelResponse;
use tt_prompt::{build_messages, corrective_note_for};
use tt_providers::ModelTransport;
use tt_registry::{validate_response, Registry};
use tt_sessions::Session;

pub struct ModelGateway {
    transport: Arc<dyn ModelTransport>,
    max_attempts: u32,
}

impl ModelGateway {
    pub fn new(transport: Arc<dyn ModelTransport>, max_attempts: u32) -> Self {
        Self {
            transport,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Get one contract-conforming response from the model.
    ///
    /// `expected_operation` is the session's current operation; a reply
    /// that names a different operation mid-collection is rejected and
    /// retried. Returns [`Error::GatewayExhausted`] when every attempt
    /// fails, carrying the last failure.
    pub async fn get_response(
        &self,
        registry: &Registry,
        session: &Session,
        user_message: &str,
        expected_operation: Option<&str>,
    ) -> Result<ModelResponse> {
        let mut corrective_note: Option<String> = None;
        let mut last_error: Option<Error> = None;

        for attempt in 1..=self.max_attempts {
            let messages = build_messages(
                registry.specs(),
                session,
                user_message,
                corrective_note.as_deref(),
            );

            match self.transport.send(&messages).await {
                Ok(raw) => match validate_response(&raw, registry, expected_operation) {
                    Ok(response) => {
                        tracing::debug!(
                            attempt,
                            transport = %self.transport.transport_id(),
                            operation = response.operation().unwrap_or("-"),
                            "model reply accepted"
                        );
                        return Ok(response);
                    }
                    Err(e) => {
                        tracing::warn!(attempt, error = %e, "model reply rejected");
                        if e.is_contract_violation() {
                            corrective_note = Some(corrective_note_for(&e));
                        }
                        last_error = Some(e);
                    }
                },
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "model transport failed");
                    last_error = Some(e);
                }
            }
        }

        Err(Error::GatewayExhausted {
            attempts: self.max_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts made".into()),
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use parking_lot::Mutex;
    use tt_domain::message::{ChatMessage, Role};
    use tt_domain::operation::{ArgMap, OperationSpec, ParamKind, ParamSpec};
    use tt_registry::{OpContext, OperationHandler};

    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<String>>>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().collect()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests_sent(&self) -> usize {
            self.seen.lock().len()
        }

        fn request(&self, i: usize) -> Vec<ChatMessage> {
            self.seen.lock()[i].clone()
        }
    }

    #[async_trait::async_trait]
    impl ModelTransport for ScriptedTransport {
        async fn send(&self, messages: &[ChatMessage]) -> Result<String> {
            self.seen.lock().push(messages.to_vec());
            self.replies
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Other("script exhausted".into())))
        }

        fn transport_id(&self) -> &str {
            "scripted"
        }
    }

    struct Echo;

    #[async_trait::async_trait]
    impl OperationHandler for Echo {
        async fn call(&self, _ctx: &OpContext, _args: &ArgMap) -> Result<String> {
            Ok("done".into())
        }
    }

    fn registry() -> Registry {
        let mut reg = Registry::new();
        let spec = OperationSpec::new("update_prep_time", "prep time")
            .with_param(ParamSpec::required(
                "restaurant_id",
                ParamKind::Integer,
                "id",
            ))
            .with_param(ParamSpec::required(
                "prep_time_minutes",
                ParamKind::Integer,
                "minutes",
            ));
        reg.register(spec, Arc::new(Echo)).unwrap();
        reg
    }

    fn session() -> Session {
        Session::new_idle("s1", 1, 1)
    }

    fn note_count(messages: &[ChatMessage]) -> usize {
        messages
            .iter()
            .filter(|m| m.content.contains("was rejected"))
            .count()
    }

    const ASK: &str =
        r#"{"type":"ask_user","message":"How many minutes?","current_operation":"update_prep_time"}"#;

    #[tokio::test]
    async fn first_valid_reply_short_circuits() {
        let transport = ScriptedTransport::new(vec![Ok(ASK.into())]);
        let gateway = ModelGateway::new(transport.clone(), 3);

        let response = gateway
            .get_response(&registry(), &session(), "set prep time", None)
            .await
            .unwrap();

        assert!(matches!(response, ModelResponse::AskUser { .. }));
        assert_eq!(transport.requests_sent(), 1);
    }

    #[tokio::test]
    async fn contract_violation_earns_note_on_retry() {
        let transport = ScriptedTransport::new(vec![Ok("sure thing!".into()), Ok(ASK.into())]);
        let gateway = ModelGateway::new(transport.clone(), 3);

        gateway
            .get_response(&registry(), &session(), "set prep time", None)
            .await
            .unwrap();

        assert_eq!(transport.requests_sent(), 2);
        assert_eq!(note_count(&transport.request(0)), 0);

        let retry = transport.request(1);
        assert_eq!(note_count(&retry), 1);
        let last = retry.last().unwrap();
        assert_eq!(last.role, Role::System);
        assert!(last.content.contains("was rejected"));
    }

    #[tokio::test]
    async fn transport_failure_retried_without_note() {
        let transport = ScriptedTransport::new(vec![
            Err(Error::Http("connection refused".into())),
            Ok(ASK.into()),
        ]);
        let gateway = ModelGateway::new(transport.clone(), 3);

        gateway
            .get_response(&registry(), &session(), "set prep time", None)
            .await
            .unwrap();

        assert_eq!(transport.requests_sent(), 2);
        let retry = transport.request(1);
        assert_eq!(note_count(&retry), 0);
        assert_eq!(retry.last().unwrap().role, Role::User);
    }

    #[tokio::test]
    async fn only_last_note_carried() {
        let unknown_op = r#"{"type":"call_operation","name":"order_pizza","arguments":{}}"#;
        let transport = ScriptedTransport::new(vec![
            Ok("not json".into()),
            Ok(unknown_op.into()),
            Ok(ASK.into()),
        ]);
        let gateway = ModelGateway::new(transport.clone(), 3);

        gateway
            .get_response(&registry(), &session(), "set prep time", None)
            .await
            .unwrap();

        let third = transport.request(2);
        assert_eq!(note_count(&third), 1);
        let note = &third.last().unwrap().content;
        assert!(note.contains("order_pizza"));
        assert!(!note.contains("not valid JSON"));
    }

    #[tokio::test]
    async fn exhaustion_reports_attempts_and_last_error() {
        let transport = ScriptedTransport::new(vec![
            Ok("bad".into()),
            Ok("worse".into()),
            Ok("still bad".into()),
        ]);
        let gateway = ModelGateway::new(transport.clone(), 3);

        let err = gateway
            .get_response(&registry(), &session(), "set prep time", None)
            .await
            .unwrap_err();

        assert_eq!(transport.requests_sent(), 3);
        match err {
            Error::GatewayExhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("JSON"));
            }
            other => panic!("expected GatewayExhausted, got {other:?}"),
        }
    }
}
