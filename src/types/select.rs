//! Selection options for filtered queries.

use sea_orm::{Condition, Order};

use super::Mapping;

/// Sort direction for an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        }
    }
}

/// An explicit ordering: field name plus direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

/// Filter options consumed by `select`, `get_item` and `get_last`.
///
/// Defaults match the factory contract: live records only
/// (`is_deleted = false`), no extra filters, no ordering. `force`
/// bypasses the soft-delete filter entirely.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub force: bool,
    pub is_deleted: bool,
    pub order_by: Option<OrderBy>,
    pub query: Option<Condition>,
    pub plain: Option<Mapping>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bypass the soft-delete filter entirely.
    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    /// Match records whose soft-delete flag equals `deleted`.
    pub fn is_deleted(mut self, deleted: bool) -> Self {
        self.is_deleted = deleted;
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = Some(order);
        self
    }

    /// Attach an arbitrary filter condition, AND-combined with any
    /// condition already present.
    pub fn query(mut self, condition: Condition) -> Self {
        self.query = Some(match self.query.take() {
            Some(existing) => existing.add(condition),
            None => condition,
        });
        self
    }

    /// Attach plain equality filters.
    pub fn plain(mut self, mapping: Mapping) -> Self {
        self.plain = Some(mapping);
        self
    }

    /// Stable textual signature of the attached condition, for cache-key
    /// generation.
    pub fn query_signature(&self) -> Option<String> {
        self.query.as_ref().map(|q| format!("{q:?}"))
    }
}
