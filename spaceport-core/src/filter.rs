//! Multi-criteria ship filtering.

use chrono::{DateTime, Utc};

use crate::domain::{Ship, ShipType};
use crate::validation::{strictly_between, within};

/// Optional filter criteria for listing and counting ships.
///
/// Every field left as `None` imposes no constraint. Text criteria match by
/// case-sensitive substring. Date bounds are strict; numeric ranges are
/// inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipCriteria {
    /// Substring the name must contain.
    pub name: Option<String>,
    /// Substring the planet must contain.
    pub planet: Option<String>,
    /// Exact ship type.
    pub ship_type: Option<ShipType>,
    /// Production date must be strictly after this instant.
    pub after: Option<DateTime<Utc>>,
    /// Production date must be strictly before this instant.
    pub before: Option<DateTime<Utc>>,
    /// Exact used flag.
    pub used: Option<bool>,
    /// Minimum speed, inclusive.
    pub min_speed: Option<f64>,
    /// Maximum speed, inclusive.
    pub max_speed: Option<f64>,
    /// Minimum crew size, inclusive.
    pub min_crew_size: Option<i32>,
    /// Maximum crew size, inclusive.
    pub max_crew_size: Option<i32>,
    /// Minimum rating, inclusive.
    pub min_rating: Option<f64>,
    /// Maximum rating, inclusive.
    pub max_rating: Option<f64>,
}

impl ShipCriteria {
    /// Returns true when no criterion is supplied.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Returns true when the ship satisfies every supplied criterion.
    pub fn matches(&self, ship: &Ship) -> bool {
        if self
            .name
            .as_deref()
            .is_some_and(|part| !ship.name.contains(part))
        {
            return false;
        }
        if self
            .planet
            .as_deref()
            .is_some_and(|part| !ship.planet.contains(part))
        {
            return false;
        }
        if self.ship_type.is_some_and(|kind| kind != ship.ship_type) {
            return false;
        }
        if self.used.is_some_and(|used| used != ship.used) {
            return false;
        }

        strictly_between(ship.prod_date, self.after, self.before)
            && within(ship.speed, self.min_speed, self.max_speed)
            && within(ship.crew_size, self.min_crew_size, self.max_crew_size)
            && within(ship.rating, self.min_rating, self.max_rating)
    }

    /// Keep the ships that match, preserving input order.
    pub fn apply<I>(&self, ships: I) -> Vec<Ship>
    where
        I: IntoIterator<Item = Ship>,
    {
        ships.into_iter().filter(|ship| self.matches(ship)).collect()
    }
}
