// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tracing::{debug, info, warn};

use super::{new_id, normalize_optional, now, required_text};
use crate::db::{self, KEY_CATEGORIES};
use crate::error::{LedgerError, Result};
use crate::models::{Category, CategoryPatch, CategoryType, NewCategory};

/// (slug, name, icon, color, parent slug)
type Seed = (&'static str, &'static str, &'static str, &'static str, Option<&'static str>);

const EXPENSE_SEEDS: &[Seed] = &[
    ("food", "Food & Dining", "utensils", "#f97316", None),
    ("groceries", "Groceries", "basket", "#fb923c", Some("food")),
    ("restaurants", "Restaurants", "chef-hat", "#fdba74", Some("food")),
    ("transport", "Transport", "bus", "#3b82f6", None),
    ("shopping", "Shopping", "shopping-bag", "#ec4899", None),
    ("housing", "Housing", "home", "#8b5cf6", None),
    ("utilities", "Utilities", "plug", "#a78bfa", Some("housing")),
    ("entertainment", "Entertainment", "film", "#eab308", None),
    ("health", "Health", "heart-pulse", "#ef4444", None),
    ("education", "Education", "book", "#14b8a6", None),
    ("other", "Other Expense", "circle", "#6b7280", None),
];

const INCOME_SEEDS: &[Seed] = &[
    ("salary", "Salary", "briefcase", "#22c55e", None),
    ("bonus", "Bonus", "gift", "#4ade80", None),
    ("investment", "Investment Return", "trending-up", "#10b981", None),
    ("parttime", "Part-time", "clock", "#84cc16", None),
    ("other", "Other Income", "circle", "#6b7280", None),
];

fn seed_id(t: CategoryType, slug: &str) -> String {
    format!("sys-{}-{}", t, slug)
}

/// The built-in, undeletable category set.
pub fn seed_categories() -> Vec<Category> {
    let ts = now();
    [
        (CategoryType::Expense, EXPENSE_SEEDS),
        (CategoryType::Income, INCOME_SEEDS),
    ]
    .into_iter()
    .flat_map(|(t, seeds)| {
        seeds.iter().map(move |(slug, name, icon, color, parent)| Category {
            id: seed_id(t, slug),
            name: name.to_string(),
            category_type: t,
            icon: Some(icon.to_string()),
            color: Some(color.to_string()),
            parent_id: parent.map(|p| seed_id(t, p)),
            is_system: true,
            created_at: ts,
            updated_at: ts,
        })
    })
    .collect()
}

pub struct CategoryStore<'a> {
    conn: &'a Connection,
}

impl<'a> CategoryStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Loads the collection, writing the seed set first if it is empty.
    fn load(&self) -> Result<Vec<Category>> {
        let items: Vec<Category> = db::load_collection(self.conn, KEY_CATEGORIES)?;
        if !items.is_empty() {
            return Ok(items);
        }
        let seeds = seed_categories();
        db::save_collection(self.conn, KEY_CATEGORIES, &seeds)?;
        info!(count = seeds.len(), "seeded system categories");
        Ok(seeds)
    }

    pub fn list(&self, type_filter: Option<CategoryType>) -> Result<Vec<Category>> {
        let items = self.load()?;
        Ok(match type_filter {
            Some(t) => items.into_iter().filter(|c| c.category_type == t).collect(),
            None => items,
        })
    }

    pub fn get(&self, id: &str) -> Result<Option<Category>> {
        Ok(self.load()?.into_iter().find(|c| c.id == id))
    }

    /// Children of `parent_id`, in stored order.
    pub fn children(&self, parent_id: &str) -> Result<Vec<Category>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|c| c.parent_id.as_deref() == Some(parent_id))
            .collect())
    }

    pub fn add(&self, spec: NewCategory) -> Result<Category> {
        let mut items = self.load()?;
        let parent_id = normalize_optional(spec.parent_id);
        if let Some(pid) = &parent_id {
            check_parent(&items, None, pid, spec.category_type)?;
        }
        let ts = now();
        let category = Category {
            id: new_id(),
            name: required_text("category name", &spec.name)?,
            category_type: spec.category_type,
            icon: normalize_optional(spec.icon),
            color: normalize_optional(spec.color),
            parent_id,
            is_system: false,
            created_at: ts,
            updated_at: ts,
        };
        items.push(category.clone());
        db::save_collection(self.conn, KEY_CATEGORIES, &items)?;
        debug!(category_id = %category.id, name = %category.name, "category added");
        Ok(category)
    }

    /// Overwrites the given fields. Changing `category_type` is allowed but
    /// existing bills are not re-checked.
    pub fn update(&self, id: &str, patch: CategoryPatch) -> Result<Option<Category>> {
        let mut items = self.load()?;
        let Some(idx) = items.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        let mut category = items[idx].clone();
        if let Some(name) = patch.name {
            category.name = required_text("category name", &name)?;
        }
        if let Some(t) = patch.category_type {
            if t != category.category_type
                && items.iter().any(|c| c.parent_id.as_deref() == Some(id))
            {
                return Err(LedgerError::invalid(format!(
                    "'{}' has children; its type cannot change",
                    category.name
                )));
            }
            category.category_type = t;
        }
        if let Some(icon) = patch.icon {
            category.icon = normalize_optional(icon);
        }
        if let Some(color) = patch.color {
            category.color = normalize_optional(color);
        }
        if let Some(parent) = patch.parent_id {
            category.parent_id = normalize_optional(parent);
        }
        if let Some(pid) = &category.parent_id {
            check_parent(&items, Some(id), pid, category.category_type)?;
            if items.iter().any(|c| c.parent_id.as_deref() == Some(id)) {
                return Err(LedgerError::invalid(
                    "a category with children cannot be nested",
                ));
            }
        }
        category.updated_at = now();
        items[idx] = category.clone();
        db::save_collection(self.conn, KEY_CATEGORIES, &items)?;
        debug!(category_id = %id, "category updated");
        Ok(Some(category))
    }

    /// Refuses system categories. Children of a removed category become
    /// top-level; bills keep their reference.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut items = self.load()?;
        let Some(target) = items.iter().find(|c| c.id == id) else {
            return Ok(false);
        };
        if target.is_system {
            warn!(category_id = %id, "refused to remove system category");
            return Err(LedgerError::Constraint(format!(
                "system category '{}' cannot be deleted",
                target.name
            )));
        }
        items.retain(|c| c.id != id);
        for c in items.iter_mut() {
            if c.parent_id.as_deref() == Some(id) {
                c.parent_id = None;
            }
        }
        db::save_collection(self.conn, KEY_CATEGORIES, &items)?;
        debug!(category_id = %id, "category removed");
        Ok(true)
    }
}

/// Parents must exist, be top-level, share the child's type and not be the
/// child itself.
fn check_parent(
    items: &[Category],
    child_id: Option<&str>,
    parent_id: &str,
    child_type: CategoryType,
) -> Result<()> {
    if child_id == Some(parent_id) {
        return Err(LedgerError::invalid("a category cannot be its own parent"));
    }
    let parent = items
        .iter()
        .find(|c| c.id == parent_id)
        .ok_or_else(|| LedgerError::missing("category", parent_id))?;
    if parent.parent_id.is_some() {
        return Err(LedgerError::invalid(format!(
            "'{}' is already nested; only one level is allowed",
            parent.name
        )));
    }
    if parent.category_type != child_type {
        return Err(LedgerError::invalid(format!(
            "parent '{}' is {}, child is {}",
            parent.name, parent.category_type, child_type
        )));
    }
    Ok(())
}
