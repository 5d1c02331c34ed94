//! Demo seed data for local development.

use std::collections::BTreeMap;

use tt_domain::error::Result;

use crate::store::{MenuGroup, MenuItem, Restaurant, RestaurantStore};

fn item(
    id: i64,
    group_id: i64,
    name: &str,
    description: &str,
    price_cents: i64,
    tags: &[&str],
) -> MenuItem {
    MenuItem {
        id,
        group_id: Some(group_id),
        name: name.into(),
        description: Some(description.into()),
        price_cents,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// The demo restaurant used by `tabletalk seed` and the handler tests.
pub fn demo_restaurant() -> Restaurant {
    let business_hours: BTreeMap<String, String> = [
        ("monday", "09:00-21:00"),
        ("tuesday", "09:00-21:00"),
        ("wednesday", "09:00-21:00"),
        ("thursday", "09:00-21:00"),
        ("friday", "09:00-22:00"),
        ("saturday", "10:00-22:00"),
        ("sunday", "10:00-20:00"),
    ]
    .into_iter()
    .map(|(d, h)| (d.to_string(), h.to_string()))
    .collect();

    Restaurant {
        id: 1,
        owner_id: 1,
        name: "Demo Restaurant".into(),
        address: Some("123 Main St, Anytown, State 12345".into()),
        business_hours,
        prep_time_minutes: 30,
        is_paused: false,
        menu_groups: vec![
            MenuGroup {
                id: 1,
                name: "Appetizers".into(),
            },
            MenuGroup {
                id: 2,
                name: "Main Courses".into(),
            },
            MenuGroup {
                id: 3,
                name: "Desserts".into(),
            },
            MenuGroup {
                id: 4,
                name: "Beverages".into(),
            },
        ],
        menu_items: vec![
            item(
                1,
                1,
                "Spring Rolls",
                "Fresh vegetables wrapped in rice paper with peanut sauce",
                850,
                &["vegetarian", "vegan"],
            ),
            item(
                2,
                1,
                "Buffalo Wings",
                "Crispy chicken wings tossed in spicy buffalo sauce",
                1299,
                &["spicy"],
            ),
            item(
                3,
                1,
                "Caesar Salad",
                "Romaine lettuce with parmesan, croutons, and caesar dressing",
                950,
                &["vegetarian"],
            ),
            item(
                4,
                2,
                "Grilled Salmon",
                "Fresh Atlantic salmon with lemon butter sauce and vegetables",
                2499,
                &["gluten-free"],
            ),
            item(
                5,
                2,
                "Beef Burger",
                "Angus beef patty with lettuce, tomato, and special sauce",
                1599,
                &[],
            ),
            item(
                6,
                2,
                "Vegetable Stir Fry",
                "Seasonal vegetables in savory sauce over jasmine rice",
                1399,
                &["vegetarian", "vegan"],
            ),
            item(
                7,
                3,
                "Chocolate Lava Cake",
                "Warm chocolate cake with molten center and vanilla ice cream",
                899,
                &["vegetarian"],
            ),
            item(
                8,
                3,
                "New York Cheesecake",
                "Classic creamy cheesecake with berry compote",
                799,
                &["vegetarian"],
            ),
            item(
                9,
                4,
                "Fresh Lemonade",
                "House-made lemonade with fresh lemon juice",
                399,
                &["vegan"],
            ),
            item(10, 4, "Iced Coffee", "Cold brew coffee served over ice", 449, &["vegan"]),
        ],
    }
}

/// Seed the store with the demo restaurant.
///
/// Returns `false` without touching anything when restaurant 1 already
/// exists, so repeated runs are safe.
pub fn seed(store: &RestaurantStore) -> Result<bool> {
    if store.contains(1) {
        tracing::info!("seed data already present, skipping");
        return Ok(false);
    }

    let restaurant = demo_restaurant();
    tracing::info!(
        restaurant = %restaurant.name,
        groups = restaurant.menu_groups.len(),
        items = restaurant.menu_items.len(),
        "seeding demo restaurant"
    );
    store.upsert(restaurant)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_restaurant_shape() {
        let r = demo_restaurant();
        assert_eq!(r.id, 1);
        assert_eq!(r.owner_id, 1);
        assert_eq!(r.menu_groups.len(), 4);
        assert_eq!(r.menu_items.len(), 10);
        assert_eq!(r.business_hours["friday"], "09:00-22:00");
        assert!(!r.is_paused);
    }

    #[test]
    fn seeding_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = RestaurantStore::new(dir.path()).unwrap();

        assert!(seed(&store).unwrap());
        // Mutate, then re-seed; the mutation must survive.
        store
            .update(1, |r| {
                r.prep_time_minutes = 55;
                Ok(())
            })
            .unwrap();
        assert!(!seed(&store).unwrap());
        assert_eq!(store.get(1).unwrap().prep_time_minutes, 55);
    }
}
