//! Operation catalog: declares the eight owner-facing operations and
//! registers them with their handlers.
//!
//! Every operation declares `restaurant_id` first; the orchestrator fills
//! it from the turn context, so the model never has to ask for it.

use std::sync::Arc;

use serde_json::Value;

use tt_domain::error::{Error, Result};
use tt_domain::operation::{ArgMap, OperationSpec, ParamKind, ParamSpec};
use tt_registry::Registry;

use crate::dashboard::{
    SetRestaurantPauseState, UpdateBusinessHours, UpdatePrepTime, UpdateRestaurantAddress,
};
use crate::menu::{CreateMenuGroup, CreateMenuItem, ToggleMenuItemTag, UpdateMenuItemPrice};
use crate::store::RestaurantStore;

pub const UPDATE_BUSINESS_HOURS: &str = "update_business_hours";
pub const UPDATE_PREP_TIME: &str = "update_prep_time";
pub const SET_RESTAURANT_PAUSE_STATE: &str = "set_restaurant_pause_state";
pub const UPDATE_RESTAURANT_ADDRESS: &str = "update_restaurant_address";
pub const CREATE_MENU_GROUP: &str = "create_menu_group";
pub const CREATE_MENU_ITEM: &str = "create_menu_item";
pub const UPDATE_MENU_ITEM_PRICE: &str = "update_menu_item_price";
pub const TOGGLE_MENU_ITEM_TAG: &str = "toggle_menu_item_tag";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Shared handler helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Deserialize a validated argument map into an operation's param struct.
///
/// By the time a handler runs, keys and JSON types have already been
/// checked against the operation's declared fields, so a failure here
/// is a handler bug rather than bad model output.
pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(
    operation: &str,
    args: &ArgMap,
) -> Result<T> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| Error::handler(operation, format!("invalid arguments: {e}")))
}

pub(crate) fn restaurant_not_found(operation: &str, id: i64) -> Error {
    Error::handler(operation, format!("Restaurant with ID {id} not found"))
}

fn restaurant_id_param() -> ParamSpec {
    ParamSpec::required("restaurant_id", ParamKind::Integer, "The restaurant ID")
}

fn weekday_enum() -> ParamKind {
    ParamKind::Enum(
        [
            "monday",
            "tuesday",
            "wednesday",
            "thursday",
            "friday",
            "saturday",
            "sunday",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Specs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn spec_update_business_hours() -> OperationSpec {
    OperationSpec::new(
        UPDATE_BUSINESS_HOURS,
        "Update the business hours for a specific day of the week",
    )
    .with_param(restaurant_id_param())
    .with_param(ParamSpec::required(
        "day",
        weekday_enum(),
        "Day of the week (monday, tuesday, etc.)",
    ))
    .with_param(ParamSpec::required(
        "hours",
        ParamKind::String,
        "Business hours in format HH:MM-HH:MM (e.g., 09:00-17:00)",
    ))
}

fn spec_update_prep_time() -> OperationSpec {
    OperationSpec::new(
        UPDATE_PREP_TIME,
        "Update the preparation time in minutes for the restaurant",
    )
    .with_param(restaurant_id_param())
    .with_param(ParamSpec::required(
        "prep_time_minutes",
        ParamKind::Integer,
        "Preparation time in minutes",
    ))
}

fn spec_set_restaurant_pause_state() -> OperationSpec {
    OperationSpec::new(
        SET_RESTAURANT_PAUSE_STATE,
        "Pause or unpause the restaurant (stops accepting orders when paused)",
    )
    .with_param(restaurant_id_param())
    .with_param(ParamSpec::required(
        "is_paused",
        ParamKind::Boolean,
        "True to pause, false to unpause",
    ))
}

fn spec_update_restaurant_address() -> OperationSpec {
    OperationSpec::new(
        UPDATE_RESTAURANT_ADDRESS,
        "Update the restaurant's physical address",
    )
    .with_param(restaurant_id_param())
    .with_param(ParamSpec::required(
        "address",
        ParamKind::String,
        "The new address",
    ))
}

fn spec_create_menu_group() -> OperationSpec {
    OperationSpec::new(
        CREATE_MENU_GROUP,
        "Create a new menu group/category (e.g., Appetizers, Main Courses, Desserts)",
    )
    .with_param(restaurant_id_param())
    .with_param(ParamSpec::required(
        "name",
        ParamKind::String,
        "Name of the menu group",
    ))
}

fn spec_create_menu_item() -> OperationSpec {
    OperationSpec::new(
        CREATE_MENU_ITEM,
        "Create a new menu item with name, description, price, and optional group",
    )
    .with_param(restaurant_id_param())
    .with_param(ParamSpec::required(
        "name",
        ParamKind::String,
        "Name of the menu item",
    ))
    .with_param(ParamSpec::required(
        "price",
        ParamKind::Number,
        "Price in dollars (e.g., 12.99)",
    ))
    .with_param(ParamSpec::optional(
        "description",
        ParamKind::String,
        "Description of the menu item",
    ))
    .with_param(ParamSpec::optional(
        "group_name",
        ParamKind::String,
        "Name of the menu group to add this item to",
    ))
}

fn spec_update_menu_item_price() -> OperationSpec {
    OperationSpec::new(
        UPDATE_MENU_ITEM_PRICE,
        "Update the price of an existing menu item",
    )
    .with_param(restaurant_id_param())
    .with_param(ParamSpec::required(
        "item_name",
        ParamKind::String,
        "Name of the menu item to update",
    ))
    .with_param(ParamSpec::required(
        "new_price",
        ParamKind::Number,
        "New price in dollars (e.g., 15.99)",
    ))
}

fn spec_toggle_menu_item_tag() -> OperationSpec {
    OperationSpec::new(
        TOGGLE_MENU_ITEM_TAG,
        "Add or remove a tag from a menu item (e.g., 'vegetarian', 'spicy', 'gluten-free')",
    )
    .with_param(restaurant_id_param())
    .with_param(ParamSpec::required(
        "item_name",
        ParamKind::String,
        "Name of the menu item",
    ))
    .with_param(ParamSpec::required(
        "tag",
        ParamKind::String,
        "Tag to add or remove (e.g., 'vegetarian', 'spicy')",
    ))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Registration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Register all built-in operations against the given store.
///
/// The registry is built once at startup and never mutated afterward.
pub fn register_all(registry: &mut Registry, store: &Arc<RestaurantStore>) -> Result<()> {
    registry.register(
        spec_update_business_hours(),
        Arc::new(UpdateBusinessHours {
            store: Arc::clone(store),
        }),
    )?;
    registry.register(
        spec_update_prep_time(),
        Arc::new(UpdatePrepTime {
            store: Arc::clone(store),
        }),
    )?;
    registry.register(
        spec_set_restaurant_pause_state(),
        Arc::new(SetRestaurantPauseState {
            store: Arc::clone(store),
        }),
    )?;
    registry.register(
        spec_update_restaurant_address(),
        Arc::new(UpdateRestaurantAddress {
            store: Arc::clone(store),
        }),
    )?;
    registry.register(
        spec_create_menu_group(),
        Arc::new(CreateMenuGroup {
            store: Arc::clone(store),
        }),
    )?;
    registry.register(
        spec_create_menu_item(),
        Arc::new(CreateMenuItem {
            store: Arc::clone(store),
        }),
    )?;
    registry.register(
        spec_update_menu_item_price(),
        Arc::new(UpdateMenuItemPrice {
            store: Arc::clone(store),
        }),
    )?;
    registry.register(
        spec_toggle_menu_item_tag(),
        Arc::new(ToggleMenuItemTag {
            store: Arc::clone(store),
        }),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use serde_json::json;
    use tt_registry::OpContext;

    fn registry_with_store() -> (tempfile::TempDir, Registry, Arc<RestaurantStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RestaurantStore::new(dir.path()).unwrap());
        store.upsert(seed::demo_restaurant()).unwrap();
        let mut registry = Registry::new();
        register_all(&mut registry, &store).unwrap();
        (dir, registry, store)
    }

    #[test]
    fn all_eight_operations_registered_in_order() {
        let (_dir, registry, _store) = registry_with_store();
        let names: Vec<&str> = registry.specs().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                UPDATE_BUSINESS_HOURS,
                UPDATE_PREP_TIME,
                SET_RESTAURANT_PAUSE_STATE,
                UPDATE_RESTAURANT_ADDRESS,
                CREATE_MENU_GROUP,
                CREATE_MENU_ITEM,
                UPDATE_MENU_ITEM_PRICE,
                TOGGLE_MENU_ITEM_TAG,
            ]
        );
    }

    #[test]
    fn every_operation_requires_restaurant_id_first() {
        let (_dir, registry, _store) = registry_with_store();
        for spec in registry.specs() {
            let first = &spec.params[0];
            assert_eq!(first.name, "restaurant_id", "operation {}", spec.name);
            assert!(first.required, "operation {}", spec.name);
        }
    }

    #[test]
    fn weekday_enum_lists_seven_days() {
        let (_dir, registry, _store) = registry_with_store();
        let spec = registry.get_spec(UPDATE_BUSINESS_HOURS).unwrap();
        let day = spec.param("day").unwrap();
        match &day.kind {
            ParamKind::Enum(values) => {
                assert_eq!(values.len(), 7);
                assert!(values.contains(&"monday".to_string()));
                assert!(values.contains(&"sunday".to_string()));
            }
            other => panic!("day should be an enum, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatch_runs_handlers_end_to_end() {
        let (_dir, registry, store) = registry_with_store();
        let ctx = OpContext {
            owner_id: 1,
            restaurant_id: 1,
        };

        let args = json!({"restaurant_id": 1, "prep_time_minutes": 40})
            .as_object()
            .unwrap()
            .clone();
        let result = registry
            .dispatch(UPDATE_PREP_TIME, &ctx, &args)
            .await
            .unwrap();

        assert_eq!(result, "Prep time updated from 30 to 40 minutes.");
        assert_eq!(store.get(1).unwrap().prep_time_minutes, 40);
    }

    #[tokio::test]
    async fn dispatch_rejects_incomplete_arguments() {
        let (_dir, registry, _store) = registry_with_store();
        let ctx = OpContext {
            owner_id: 1,
            restaurant_id: 1,
        };

        let args = json!({"restaurant_id": 1}).as_object().unwrap().clone();
        let err = registry
            .dispatch(UPDATE_BUSINESS_HOURS, &ctx, &args)
            .await
            .unwrap_err();

        match err {
            Error::IncompleteArguments { operation, missing } => {
                assert_eq!(operation, UPDATE_BUSINESS_HOURS);
                assert_eq!(missing, vec!["day", "hours"]);
            }
            other => panic!("expected IncompleteArguments, got {other:?}"),
        }
    }
}
