//! Category service
//!
//! Category CRUD with case-insensitive name uniqueness. Every write path
//! invalidates the category cache so derivations never observe a stale
//! category list after a write.

use crate::audit::AuditEntry;
use crate::cache::CategoryCache;
use crate::error::{DigibookError, DigibookResult};
use crate::models::{Category, CategoryId};
use crate::storage::Store;
use crate::validation::{validate_category, CategoryInput};

/// Service for category management
pub struct CategoryService<'a> {
    store: &'a Store,
    cache: &'a CategoryCache,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(store: &'a Store, cache: &'a CategoryCache) -> Self {
        Self { store, cache }
    }

    /// Create a category from raw input
    pub fn create(&self, input: CategoryInput) -> DigibookResult<Category> {
        let existing = self.store.read(|db| db.categories.clone())?;
        let check = validate_category(&input, &existing);
        let Some(sanitized) = check.sanitized else {
            let reasons: Vec<String> = check.errors.iter().map(|e| e.to_string()).collect();
            return Err(DigibookError::Validation(reasons.join("; ")));
        };

        let created = self.store.transaction(|db| {
            // Re-check uniqueness inside the transaction; the pre-check
            // ran against a separate read view
            if db.category_by_name(&sanitized.name).is_some() {
                return Err(DigibookError::Duplicate {
                    entity_type: "Category",
                    identifier: sanitized.name.clone(),
                });
            }
            let id = db.next_category_id();
            let category = Category::new(
                id,
                sanitized.name.clone(),
                sanitized.color.clone(),
                sanitized.icon.clone(),
            );
            db.categories.push(category.clone());
            db.append_audit(
                AuditEntry::created(id.to_string(), &category)
                    .with_description(category.name.clone()),
            );
            Ok(category)
        })?;

        self.cache.invalidate();
        Ok(created)
    }

    /// Get a category by id
    pub fn get(&self, id: CategoryId) -> DigibookResult<Option<Category>> {
        self.store.read(|db| db.category(id).cloned())
    }

    /// All categories, through the cache
    pub fn list(&self) -> DigibookResult<Vec<Category>> {
        self.cache.get(|| self.store.read(|db| db.categories.clone()))
    }

    /// Delete a category
    ///
    /// Seeded default categories and categories still referenced by an
    /// expense are refused.
    pub fn delete(&self, id: CategoryId) -> DigibookResult<Category> {
        let removed = self.store.transaction(|db| {
            let category = db
                .category(id)
                .cloned()
                .ok_or_else(|| DigibookError::category_not_found(id.to_string()))?;

            if category.is_default {
                return Err(DigibookError::Validation(format!(
                    "Default category '{}' cannot be deleted",
                    category.name
                )));
            }

            let needle = category.normalized_name();
            let referenced = db
                .fixed_expenses
                .iter()
                .any(|e| crate::models::normalize_name(&e.category) == needle);
            if referenced {
                return Err(DigibookError::InUse {
                    entity_type: "Category",
                    identifier: category.name.clone(),
                });
            }

            db.remove_category(id);
            db.append_audit(
                AuditEntry::deleted(id.to_string(), &category)
                    .with_description(category.name.clone()),
            );
            Ok(category)
        })?;

        self.cache.invalidate();
        Ok(removed)
    }
}
