//! Sorting and page slicing for ship listings.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Ship;

/// Page index used when the caller does not supply one.
pub const DEFAULT_PAGE_NUMBER: u32 = 0;
/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Field a ship listing can be ordered by.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipOrder {
    /// Order by identifier.
    Id,
    /// Order by speed.
    Speed,
    /// Order by production date.
    Date,
    /// Order by rating.
    Rating,
}

type Comparator = fn(&Ship, &Ship) -> Ordering;

/// Ascending comparators indexed by `ShipOrder` discriminant.
const COMPARATORS: [Comparator; 4] = [
    |a, b| a.id.cmp(&b.id),
    |a, b| a.speed.total_cmp(&b.speed),
    |a, b| a.prod_date.cmp(&b.prod_date),
    |a, b| a.rating.total_cmp(&b.rating),
];

impl ShipOrder {
    /// Ascending comparator for this field.
    pub fn comparator(self) -> Comparator {
        COMPARATORS[self as usize]
    }
}

/// Sort ships ascending by the requested field; `None` keeps the input order.
///
/// The sort is stable, so ties keep their storage order.
pub fn sort_ships(order: Option<ShipOrder>, ships: &mut [Ship]) {
    if let Some(order) = order {
        ships.sort_by(order.comparator());
    }
}

/// A zero-based page request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    /// Zero-based page index.
    pub number: u32,
    /// Maximum number of items on the page.
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Build a page request, falling back to the given defaults.
    pub fn with_defaults(number: Option<u32>, size: Option<u32>, defaults: Page) -> Self {
        Self {
            number: number.unwrap_or(defaults.number),
            size: size.unwrap_or(defaults.size),
        }
    }

    /// Keep only the items that fall on this page.
    ///
    /// A page that starts past the end is empty.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let size = self.size as usize;
        let start = (self.number as usize).saturating_mul(size);
        items.into_iter().skip(start).take(size).collect()
    }
}
