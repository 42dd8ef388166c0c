// ABOUTME: The closed set of item categories and a per-category item map
// ABOUTME: Every layer iterates categories through Category::ALL and Categorized

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Item classification used by requests and donations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothes,
    Stationary,
    Foods,
    Furniture,
    Electronics,
}

impl Category {
    /// All categories in their fixed processing order.
    pub const ALL: [Category; 5] = [
        Category::Clothes,
        Category::Stationary,
        Category::Foods,
        Category::Furniture,
        Category::Electronics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clothes => "clothes",
            Category::Stationary => "stationary",
            Category::Foods => "foods",
            Category::Furniture => "furniture",
            Category::Electronics => "electronics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One item map per category.
///
/// Every category is always present (possibly empty) so that the persisted
/// document never carries a null or missing category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de>"))]
pub struct Categorized<V> {
    #[serde(default)]
    pub clothes: BTreeMap<String, V>,
    #[serde(default)]
    pub stationary: BTreeMap<String, V>,
    #[serde(default)]
    pub foods: BTreeMap<String, V>,
    #[serde(default)]
    pub furniture: BTreeMap<String, V>,
    #[serde(default)]
    pub electronics: BTreeMap<String, V>,
}

impl<V> Default for Categorized<V> {
    fn default() -> Self {
        Self {
            clothes: BTreeMap::new(),
            stationary: BTreeMap::new(),
            foods: BTreeMap::new(),
            furniture: BTreeMap::new(),
            electronics: BTreeMap::new(),
        }
    }
}

impl<V> Categorized<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> &BTreeMap<String, V> {
        match category {
            Category::Clothes => &self.clothes,
            Category::Stationary => &self.stationary,
            Category::Foods => &self.foods,
            Category::Furniture => &self.furniture,
            Category::Electronics => &self.electronics,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut BTreeMap<String, V> {
        match category {
            Category::Clothes => &mut self.clothes,
            Category::Stationary => &mut self.stationary,
            Category::Foods => &mut self.foods,
            Category::Furniture => &mut self.furniture,
            Category::Electronics => &mut self.electronics,
        }
    }

    /// Iterate category maps in `Category::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &BTreeMap<String, V>)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Iterate every (category, item, value) entry.
    pub fn entries(&self) -> impl Iterator<Item = (Category, &str, &V)> {
        self.iter()
            .flat_map(|(c, items)| items.iter().map(move |(name, v)| (c, name.as_str(), v)))
    }

    pub fn insert(&mut self, category: Category, item: impl Into<String>, value: V) -> Option<V> {
        self.get_mut(category).insert(item.into(), value)
    }

    /// True when no category holds an item.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, items)| items.is_empty())
    }

    /// Number of item entries across all categories.
    pub fn len(&self) -> usize {
        self.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn map<U>(&self, mut f: impl FnMut(Category, &str, &V) -> U) -> Categorized<U> {
        let mut out = Categorized::new();
        for (category, name, value) in self.entries() {
            out.insert(category, name, f(category, name, value));
        }
        out
    }
}
