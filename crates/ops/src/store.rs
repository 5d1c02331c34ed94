//! Restaurant persistence.
//!
//! Keeps every restaurant in `restaurants.json` under the configured state
//! dir, with an in-memory map in front. Mutations go through [`RestaurantStore::update`],
//! which commits and writes through only when the closure succeeds.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use tt_domain::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Models
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A menu category such as "Appetizers" or "Desserts".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuGroup {
    pub id: i64,
    pub name: String,
}

/// A sellable item. Prices are stored in cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    #[serde(default)]
    pub group_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One restaurant with its settings and menu.
///
/// `business_hours` maps lowercase weekday names to `HH:MM-HH:MM` ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub business_hours: BTreeMap<String, String>,
    #[serde(default = "d_prep_time")]
    pub prep_time_minutes: i64,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub menu_groups: Vec<MenuGroup>,
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
}

fn d_prep_time() -> i64 {
    30
}

impl Restaurant {
    pub fn next_group_id(&self) -> i64 {
        self.menu_groups.iter().map(|g| g.id).max().unwrap_or(0) + 1
    }

    pub fn next_item_id(&self) -> i64 {
        self.menu_items.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }

    /// Case-insensitive group lookup by trimmed name.
    pub fn group_by_name(&self, name: &str) -> Option<&MenuGroup> {
        let wanted = name.trim().to_lowercase();
        self.menu_groups
            .iter()
            .find(|g| g.name.to_lowercase() == wanted)
    }

    /// Case-insensitive item lookup by trimmed name, as an index into
    /// `menu_items`.
    pub fn item_position(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.menu_items
            .iter()
            .position(|i| i.name.to_lowercase() == wanted)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// File-backed store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct RestaurantStore {
    restaurants_path: PathBuf,
    restaurants: RwLock<HashMap<i64, Restaurant>>,
}

impl RestaurantStore {
    /// Load or create the store at `state_dir/restaurants.json`.
    pub fn new(state_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_dir).map_err(Error::Io)?;

        let restaurants_path = state_dir.join("restaurants.json");
        let restaurants: HashMap<i64, Restaurant> = if restaurants_path.exists() {
            let raw = std::fs::read_to_string(&restaurants_path).map_err(Error::Io)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            HashMap::new()
        };

        tracing::info!(
            restaurants = restaurants.len(),
            path = %restaurants_path.display(),
            "restaurant store loaded"
        );

        Ok(Self {
            restaurants_path,
            restaurants: RwLock::new(restaurants),
        })
    }

    fn write_file(&self, restaurants: &HashMap<i64, Restaurant>) -> Result<()> {
        let json = serde_json::to_string_pretty(restaurants)
            .map_err(|e| Error::Other(format!("serializing restaurants: {e}")))?;
        std::fs::write(&self.restaurants_path, json).map_err(Error::Io)
    }

    pub fn get(&self, id: i64) -> Option<Restaurant> {
        self.restaurants.read().get(&id).cloned()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.restaurants.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.restaurants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.read().is_empty()
    }

    /// Insert or replace a restaurant and write through.
    pub fn upsert(&self, restaurant: Restaurant) -> Result<()> {
        let mut restaurants = self.restaurants.write();
        restaurants.insert(restaurant.id, restaurant);
        self.write_file(&restaurants)
    }

    /// Mutate one restaurant under the write lock.
    ///
    /// Returns `Ok(None)` when the id is unknown. The closure runs against a
    /// copy; the copy is committed and written through only when the closure
    /// returns `Ok`, so a failed mutation leaves stored state untouched.
    pub fn update<T>(
        &self,
        id: i64,
        f: impl FnOnce(&mut Restaurant) -> Result<T>,
    ) -> Result<Option<T>> {
        let mut restaurants = self.restaurants.write();
        let Some(existing) = restaurants.get(&id) else {
            return Ok(None);
        };

        let mut updated = existing.clone();
        let out = f(&mut updated)?;
        restaurants.insert(id, updated);
        self.write_file(&restaurants)?;
        Ok(Some(out))
    }

    /// Persist everything (shutdown path).
    pub fn flush(&self) -> Result<()> {
        let restaurants = self.restaurants.read();
        self.write_file(&restaurants)
    }
}
