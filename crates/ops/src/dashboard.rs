//! Dashboard operations: business hours, prep time, pause state, address.

use std::sync::Arc;

use serde::Deserialize;

use tt_domain::error::{Error, Result};
use tt_domain::operation::ArgMap;
use tt_registry::{OpContext, OperationHandler};

use crate::catalog::{self, parse_args, restaurant_not_found};
use crate::store::RestaurantStore;
use crate::util::{capitalize, validate_hours};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// update_business_hours
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct UpdateBusinessHours {
    pub store: Arc<RestaurantStore>,
}

#[derive(Debug, Deserialize)]
struct BusinessHoursArgs {
    restaurant_id: i64,
    day: String,
    hours: String,
}

#[async_trait::async_trait]
impl OperationHandler for UpdateBusinessHours {
    async fn call(&self, _ctx: &OpContext, args: &ArgMap) -> Result<String> {
        const OP: &str = catalog::UPDATE_BUSINESS_HOURS;
        let args: BusinessHoursArgs = parse_args(OP, args)?;

        let hours = args.hours.trim().to_string();
        if !validate_hours(&hours) {
            return Err(Error::handler(
                OP,
                "Invalid hours format. Please use HH:MM-HH:MM (e.g., 09:00-17:00).",
            ));
        }

        let day = args.day.trim().to_lowercase();
        self.store
            .update(args.restaurant_id, |r| {
                r.business_hours.insert(day.clone(), hours.clone());
                Ok(format!(
                    "Business hours for {} updated to {}.",
                    capitalize(&day),
                    hours
                ))
            })?
            .ok_or_else(|| restaurant_not_found(OP, args.restaurant_id))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// update_prep_time
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct UpdatePrepTime {
    pub store: Arc<RestaurantStore>,
}

#[derive(Debug, Deserialize)]
struct PrepTimeArgs {
    restaurant_id: i64,
    prep_time_minutes: i64,
}

#[async_trait::async_trait]
impl OperationHandler for UpdatePrepTime {
    async fn call(&self, _ctx: &OpContext, args: &ArgMap) -> Result<String> {
        const OP: &str = catalog::UPDATE_PREP_TIME;
        let args: PrepTimeArgs = parse_args(OP, args)?;

        if args.prep_time_minutes < 0 {
            return Err(Error::handler(OP, "Preparation time must be a positive number"));
        }

        self.store
            .update(args.restaurant_id, |r| {
                let old = r.prep_time_minutes;
                r.prep_time_minutes = args.prep_time_minutes;
                Ok(format!(
                    "Prep time updated from {} to {} minutes.",
                    old, args.prep_time_minutes
                ))
            })?
            .ok_or_else(|| restaurant_not_found(OP, args.restaurant_id))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// set_restaurant_pause_state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct SetRestaurantPauseState {
    pub store: Arc<RestaurantStore>,
}

#[derive(Debug, Deserialize)]
struct PauseArgs {
    restaurant_id: i64,
    is_paused: bool,
}

#[async_trait::async_trait]
impl OperationHandler for SetRestaurantPauseState {
    async fn call(&self, _ctx: &OpContext, args: &ArgMap) -> Result<String> {
        const OP: &str = catalog::SET_RESTAURANT_PAUSE_STATE;
        let args: PauseArgs = parse_args(OP, args)?;

        let result = self
            .store
            .update(args.restaurant_id, |r| {
                r.is_paused = args.is_paused;
                let (verb, orders) = if args.is_paused {
                    ("paused", "New orders are stopped.")
                } else {
                    ("unpaused", "New orders are active.")
                };
                Ok(format!("{} is now {}. {}", r.name, verb, orders))
            })?
            .ok_or_else(|| restaurant_not_found(OP, args.restaurant_id))?;

        tracing::info!(
            restaurant_id = args.restaurant_id,
            is_paused = args.is_paused,
            "pause state changed"
        );
        Ok(result)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// update_restaurant_address
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct UpdateRestaurantAddress {
    pub store: Arc<RestaurantStore>,
}

#[derive(Debug, Deserialize)]
struct AddressArgs {
    restaurant_id: i64,
    address: String,
}

#[async_trait::async_trait]
impl OperationHandler for UpdateRestaurantAddress {
    async fn call(&self, _ctx: &OpContext, args: &ArgMap) -> Result<String> {
        const OP: &str = catalog::UPDATE_RESTAURANT_ADDRESS;
        let args: AddressArgs = parse_args(OP, args)?;

        let address = args.address.trim().to_string();
        if address.is_empty() {
            return Err(Error::handler(OP, "Address cannot be empty"));
        }

        self.store
            .update(args.restaurant_id, |r| {
                let old = r.address.clone().unwrap_or_else(|| "Not set".into());
                r.address = Some(address.clone());
                Ok(format!("Address updated from '{}' to '{}'.", old, address))
            })?
            .ok_or_else(|| restaurant_not_found(OP, args.restaurant_id))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use serde_json::json;

    fn seeded() -> (tempfile::TempDir, Arc<RestaurantStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RestaurantStore::new(dir.path()).unwrap());
        store.upsert(seed::demo_restaurant()).unwrap();
        (dir, store)
    }

    fn args(v: serde_json::Value) -> ArgMap {
        v.as_object().unwrap().clone()
    }

    fn ctx() -> OpContext {
        OpContext {
            owner_id: 1,
            restaurant_id: 1,
        }
    }

    #[tokio::test]
    async fn business_hours_update_is_stored() {
        let (_dir, store) = seeded();
        let handler = UpdateBusinessHours {
            store: Arc::clone(&store),
        };

        let result = handler
            .call(
                &ctx(),
                &args(json!({"restaurant_id": 1, "day": "monday", "hours": "08:00-20:00"})),
            )
            .await
            .unwrap();

        assert_eq!(result, "Business hours for Monday updated to 08:00-20:00.");
        assert_eq!(
            store.get(1).unwrap().business_hours["monday"],
            "08:00-20:00"
        );
    }

    #[tokio::test]
    async fn bad_hours_format_rejected_without_write() {
        let (_dir, store) = seeded();
        let handler = UpdateBusinessHours {
            store: Arc::clone(&store),
        };

        let err = handler
            .call(
                &ctx(),
                &args(json!({"restaurant_id": 1, "day": "monday", "hours": "9am to 5pm"})),
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("HH:MM-HH:MM"));
        assert_eq!(
            store.get(1).unwrap().business_hours["monday"],
            "09:00-21:00"
        );
    }

    #[tokio::test]
    async fn prep_time_reports_old_and_new() {
        let (_dir, store) = seeded();
        let handler = UpdatePrepTime {
            store: Arc::clone(&store),
        };

        let result = handler
            .call(
                &ctx(),
                &args(json!({"restaurant_id": 1, "prep_time_minutes": 25})),
            )
            .await
            .unwrap();

        assert_eq!(result, "Prep time updated from 30 to 25 minutes.");
        assert_eq!(store.get(1).unwrap().prep_time_minutes, 25);
    }

    #[tokio::test]
    async fn negative_prep_time_rejected() {
        let (_dir, store) = seeded();
        let handler = UpdatePrepTime { store };

        let err = handler
            .call(
                &ctx(),
                &args(json!({"restaurant_id": 1, "prep_time_minutes": -5})),
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("positive"));
    }

    #[tokio::test]
    async fn pause_and_unpause_report_order_state() {
        let (_dir, store) = seeded();
        let handler = SetRestaurantPauseState {
            store: Arc::clone(&store),
        };

        let paused = handler
            .call(&ctx(), &args(json!({"restaurant_id": 1, "is_paused": true})))
            .await
            .unwrap();
        assert_eq!(
            paused,
            "Demo Restaurant is now paused. New orders are stopped."
        );
        assert!(store.get(1).unwrap().is_paused);

        let unpaused = handler
            .call(&ctx(), &args(json!({"restaurant_id": 1, "is_paused": false})))
            .await
            .unwrap();
        assert_eq!(
            unpaused,
            "Demo Restaurant is now unpaused. New orders are active."
        );
        assert!(!store.get(1).unwrap().is_paused);
    }

    #[tokio::test]
    async fn blank_address_rejected() {
        let (_dir, store) = seeded();
        let handler = UpdateRestaurantAddress { store };

        let err = handler
            .call(&ctx(), &args(json!({"restaurant_id": 1, "address": "   "})))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("empty"));
    }

    #[tokio::test]
    async fn address_update_reports_old_and_new() {
        let (_dir, store) = seeded();
        let handler = UpdateRestaurantAddress {
            store: Arc::clone(&store),
        };

        let result = handler
            .call(
                &ctx(),
                &args(json!({"restaurant_id": 1, "address": "456 Oak Ave"})),
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            "Address updated from '123 Main St, Anytown, State 12345' to '456 Oak Ave'."
        );
    }

    #[tokio::test]
    async fn unknown_restaurant_reported() {
        let (_dir, store) = seeded();
        let handler = UpdatePrepTime { store };

        let err = handler
            .call(
                &ctx(),
                &args(json!({"restaurant_id": 99, "prep_time_minutes": 20})),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Restaurant with ID 99 not found");
    }
}
