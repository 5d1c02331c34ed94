//! Menu operations: groups, items, prices, tags.

use std::sync::Arc;

use serde::Deserialize;

use tt_domain::error::{Error, Result};
use tt_domain::operation::ArgMap;
use tt_registry::{OpContext, OperationHandler};

use crate::catalog::{self, parse_args, restaurant_not_found};
use crate::store::{MenuGroup, MenuItem, RestaurantStore};
use crate::util::{dollars_to_cents, format_price};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// create_menu_group
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct CreateMenuGroup {
    pub store: Arc<RestaurantStore>,
}

#[derive(Debug, Deserialize)]
struct CreateGroupArgs {
    restaurant_id: i64,
    name: String,
}

#[async_trait::async_trait]
impl OperationHandler for CreateMenuGroup {
    async fn call(&self, _ctx: &OpContext, args: &ArgMap) -> Result<String> {
        const OP: &str = catalog::CREATE_MENU_GROUP;
        let args: CreateGroupArgs = parse_args(OP, args)?;

        let name = args.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::handler(OP, "Menu group name cannot be empty"));
        }

        self.store
            .update(args.restaurant_id, |r| {
                if r.group_by_name(&name).is_some() {
                    return Err(Error::handler(
                        OP,
                        format!("Menu group '{name}' already exists"),
                    ));
                }
                let id = r.next_group_id();
                r.menu_groups.push(MenuGroup {
                    id,
                    name: name.clone(),
                });
                Ok(format!("Created menu group '{name}' (ID: {id})."))
            })?
            .ok_or_else(|| restaurant_not_found(OP, args.restaurant_id))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// create_menu_item
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct CreateMenuItem {
    pub store: Arc<RestaurantStore>,
}

#[derive(Debug, Deserialize)]
struct CreateItemArgs {
    restaurant_id: i64,
    name: String,
    price: f64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    group_name: Option<String>,
}

#[async_trait::async_trait]
impl OperationHandler for CreateMenuItem {
    async fn call(&self, _ctx: &OpContext, args: &ArgMap) -> Result<String> {
        const OP: &str = catalog::CREATE_MENU_ITEM;
        let args: CreateItemArgs = parse_args(OP, args)?;

        let name = args.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::handler(OP, "Menu item name cannot be empty"));
        }
        if args.price <= 0.0 {
            return Err(Error::handler(OP, "Price must be a positive number"));
        }
        let price_cents = dollars_to_cents(args.price);

        // Blank strings count as omitted for the optional fields.
        let description = args
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);
        let group_name = args
            .group_name
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from);

        self.store
            .update(args.restaurant_id, |r| {
                let group_id = match &group_name {
                    Some(g) => match r.group_by_name(g) {
                        Some(group) => Some(group.id),
                        None => {
                            return Err(Error::handler(
                                OP,
                                format!(
                                    "Menu group '{g}' not found. Please create it first or omit the group."
                                ),
                            ))
                        }
                    },
                    None => None,
                };

                let id = r.next_item_id();
                r.menu_items.push(MenuItem {
                    id,
                    group_id,
                    name: name.clone(),
                    description: description.clone(),
                    price_cents,
                    tags: Vec::new(),
                });

                let group_text = group_name
                    .as_ref()
                    .map(|g| format!(" in group '{g}'"))
                    .unwrap_or_default();
                Ok(format!(
                    "Created menu item '{}' at {}{}.",
                    name,
                    format_price(price_cents),
                    group_text
                ))
            })?
            .ok_or_else(|| restaurant_not_found(OP, args.restaurant_id))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// update_menu_item_price
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct UpdateMenuItemPrice {
    pub store: Arc<RestaurantStore>,
}

#[derive(Debug, Deserialize)]
struct UpdatePriceArgs {
    restaurant_id: i64,
    item_name: String,
    new_price: f64,
}

#[async_trait::async_trait]
impl OperationHandler for UpdateMenuItemPrice {
    async fn call(&self, _ctx: &OpContext, args: &ArgMap) -> Result<String> {
        const OP: &str = catalog::UPDATE_MENU_ITEM_PRICE;
        let args: UpdatePriceArgs = parse_args(OP, args)?;

        if args.new_price <= 0.0 {
            return Err(Error::handler(OP, "Price must be a positive number"));
        }
        let new_cents = dollars_to_cents(args.new_price);

        self.store
            .update(args.restaurant_id, |r| {
                let Some(idx) = r.item_position(&args.item_name) else {
                    return Err(item_not_found_with_suggestions(OP, r, &args.item_name));
                };
                let item = &mut r.menu_items[idx];
                let old = item.price_cents;
                item.price_cents = new_cents;
                Ok(format!(
                    "Updated '{}' price from {} to {}.",
                    item.name,
                    format_price(old),
                    format_price(new_cents)
                ))
            })?
            .ok_or_else(|| restaurant_not_found(OP, args.restaurant_id))
    }
}

/// Unknown-item error naming up to five existing items so the user can
/// correct the name without asking for the menu.
fn item_not_found_with_suggestions(
    operation: &str,
    r: &crate::store::Restaurant,
    item_name: &str,
) -> Error {
    let names: Vec<&str> = r
        .menu_items
        .iter()
        .take(5)
        .map(|i| i.name.as_str())
        .collect();
    let msg = if names.is_empty() {
        format!("Menu item '{}' not found and no items exist yet.", item_name.trim())
    } else {
        format!(
            "Menu item '{}' not found. Available items include: {}",
            item_name.trim(),
            names.join(", ")
        )
    };
    Error::handler(operation, msg)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// toggle_menu_item_tag
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct ToggleMenuItemTag {
    pub store: Arc<RestaurantStore>,
}

#[derive(Debug, Deserialize)]
struct ToggleTagArgs {
    restaurant_id: i64,
    item_name: String,
    tag: String,
}

#[async_trait::async_trait]
impl OperationHandler for ToggleMenuItemTag {
    async fn call(&self, _ctx: &OpContext, args: &ArgMap) -> Result<String> {
        const OP: &str = catalog::TOGGLE_MENU_ITEM_TAG;
        let args: ToggleTagArgs = parse_args(OP, args)?;

        let tag = args.tag.trim().to_lowercase();
        if tag.is_empty() {
            return Err(Error::handler(OP, "Tag cannot be empty"));
        }

        self.store
            .update(args.restaurant_id, |r| {
                let Some(idx) = r.item_position(&args.item_name) else {
                    return Err(Error::handler(
                        OP,
                        format!("Menu item '{}' not found", args.item_name.trim()),
                    ));
                };
                let item = &mut r.menu_items[idx];

                let (action, preposition) = match item.tags.iter().position(|t| t == &tag) {
                    Some(pos) => {
                        item.tags.remove(pos);
                        ("Removed", "from")
                    }
                    None => {
                        item.tags.push(tag.clone());
                        ("Added", "to")
                    }
                };

                let tags_str = if item.tags.is_empty() {
                    "none".to_string()
                } else {
                    item.tags.join(", ")
                };
                Ok(format!(
                    "{} tag '{}' {} '{}'. Current tags: {}",
                    action, tag, preposition, item.name, tags_str
                ))
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
    async fn group_creation_returns_id() {
        let (_dir, store) = seeded();
        let handler = CreateMenuGroup {
            store: Arc::clone(&store),
        };

        let result = handler
            .call(&ctx(), &args(json!({"restaurant_id": 1, "name": "Sides"})))
            .await
            .unwrap();

        assert_eq!(result, "Created menu group 'Sides' (ID: 5).");
        assert!(store.get(1).unwrap().group_by_name("sides").is_some());
    }

    #[tokio::test]
    async fn duplicate_group_rejected_case_insensitively() {
        let (_dir, store) = seeded();
        let handler = CreateMenuGroup { store };

        let err = handler
            .call(
                &ctx(),
                &args(json!({"restaurant_id": 1, "name": "appetizers"})),
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn item_creation_converts_dollars_to_cents() {
        let (_dir, store) = seeded();
        let handler = CreateMenuItem {
            store: Arc::clone(&store),
        };

        let result = handler
            .call(
                &ctx(),
                &args(json!({
                    "restaurant_id": 1,
                    "name": "Garlic Bread",
                    "price": 6.50,
                    "group_name": "Appetizers"
                })),
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            "Created menu item 'Garlic Bread' at $6.50 in group 'Appetizers'."
        );
        let r = store.get(1).unwrap();
        let idx = r.item_position("garlic bread").unwrap();
        assert_eq!(r.menu_items[idx].price_cents, 650);
        assert_eq!(r.menu_items[idx].group_id, Some(1));
    }

    #[tokio::test]
    async fn item_creation_without_group() {
        let (_dir, store) = seeded();
        let handler = CreateMenuItem { store };

        let result = handler
            .call(
                &ctx(),
                &args(json!({"restaurant_id": 1, "name": "Mystery Dish", "price": 10})),
            )
            .await
            .unwrap();

        assert_eq!(result, "Created menu item 'Mystery Dish' at $10.00.");
    }

    #[tokio::test]
    async fn unknown_group_fails_item_creation() {
        let (_dir, store) = seeded();
        let handler = CreateMenuItem {
            store: Arc::clone(&store),
        };

        let err = handler
            .call(
                &ctx(),
                &args(json!({
                    "restaurant_id": 1,
                    "name": "Tiramisu",
                    "price": 7.99,
                    "group_name": "Sweets"
                })),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Menu group 'Sweets' not found. Please create it first or omit the group."
        );
        // Nothing was written.
        assert!(store.get(1).unwrap().item_position("Tiramisu").is_none());
    }

    #[tokio::test]
    async fn price_update_reports_old_and_new() {
        let (_dir, store) = seeded();
        let handler = UpdateMenuItemPrice {
            store: Arc::clone(&store),
        };

        let result = handler
            .call(
                &ctx(),
                &args(json!({
                    "restaurant_id": 1,
                    "item_name": "spring rolls",
                    "new_price": 9.25
                })),
            )
            .await
            .unwrap();

        assert_eq!(result, "Updated 'Spring Rolls' price from $8.50 to $9.25.");
        let r = store.get(1).unwrap();
        let idx = r.item_position("Spring Rolls").unwrap();
        assert_eq!(r.menu_items[idx].price_cents, 925);
    }

    #[tokio::test]
    async fn unknown_item_lists_suggestions() {
        let (_dir, store) = seeded();
        let handler = UpdateMenuItemPrice { store };

        let err = handler
            .call(
                &ctx(),
                &args(json!({
                    "restaurant_id": 1,
                    "item_name": "Pizza",
                    "new_price": 12.0
                })),
            )
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("'Pizza' not found"));
        assert!(msg.contains("Spring Rolls"));
        // At most five suggestions.
        assert_eq!(msg.matches(", ").count(), 4);
    }

    #[tokio::test]
    async fn tag_toggles_on_and_off() {
        let (_dir, store) = seeded();
        let handler = ToggleMenuItemTag {
            store: Arc::clone(&store),
        };

        let added = handler
            .call(
                &ctx(),
                &args(json!({
                    "restaurant_id": 1,
                    "item_name": "Buffalo Wings",
                    "tag": "POPULAR"
                })),
            )
            .await
            .unwrap();
        assert_eq!(
            added,
            "Added tag 'popular' to 'Buffalo Wings'. Current tags: spicy, popular"
        );

        let removed = handler
            .call(
                &ctx(),
                &args(json!({
                    "restaurant_id": 1,
                    "item_name": "Buffalo Wings",
                    "tag": "popular"
                })),
            )
            .await
            .unwrap();
        assert_eq!(
            removed,
            "Removed tag 'popular' from 'Buffalo Wings'. Current tags: spicy"
        );
    }

    #[tokio::test]
    async fn removing_last_tag_reports_none() {
        let (_dir, store) = seeded();
        let handler = ToggleMenuItemTag { store };

        let result = handler
            .call(
                &ctx(),
                &args(json!({
                    "restaurant_id": 1,
                    "item_name": "Buffalo Wings",
                    "tag": "spicy"
                })),
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            "Removed tag 'spicy' from 'Buffalo Wings'. Current tags: none"
        );
    }
}
