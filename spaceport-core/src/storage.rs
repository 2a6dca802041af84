//! Storage abstractions used by the ship service.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::domain::{NewShip, Ship};
use crate::error::{Result, SpaceportError};

/// Persistence primitives the ship service depends on.
#[cfg_attr(test, mockall::automock)]
pub trait ShipRepository {
    /// Fetch every ship in storage iteration order.
    fn find_all(&self) -> Result<Vec<Ship>>;
    /// Fetch one ship by identifier.
    fn find_by_id(&self, id: i64) -> Result<Option<Ship>>;
    /// Persist a new ship and assign its identifier.
    fn insert(&self, ship: NewShip) -> Result<Ship>;
    /// Overwrite an existing ship.
    fn replace(&self, ship: &Ship) -> Result<Ship>;
    /// Remove the ship with the identifier.
    fn delete(&self, id: i64) -> Result<()>;
}

impl<R: ShipRepository + ?Sized> ShipRepository for Arc<R> {
    fn find_all(&self) -> Result<Vec<Ship>> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        (**self).find_by_id(id)
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        (**self).insert(ship)
    }

    fn replace(&self, ship: &Ship) -> Result<Ship> {
        (**self).replace(ship)
    }

    fn delete(&self, id: i64) -> Result<()> {
        (**self).delete(id)
    }
}

/// Process-local ship store keyed by identifier.
///
/// Identifiers start at 1 and are never reused, even after deletion.
#[derive(Debug, Default)]
pub struct InMemoryShipRepository {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    ships: BTreeMap<i64, Ship>,
}

impl InMemoryShipRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> SpaceportError {
        SpaceportError::Storage("ship store lock poisoned".to_string())
    }
}

impl ShipRepository for InMemoryShipRepository {
    fn find_all(&self) -> Result<Vec<Ship>> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.ships.values().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.ships.get(&id).cloned())
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        state.last_id += 1;
        let ship = ship.into_ship(state.last_id);
        state.ships.insert(ship.id, ship.clone());
        Ok(ship)
    }

    fn replace(&self, ship: &Ship) -> Result<Ship> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        match state.ships.get_mut(&ship.id) {
            Some(slot) => {
                *slot = ship.clone();
                Ok(ship.clone())
            }
            None => Err(SpaceportError::NotFound(ship.id)),
        }
    }

    fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        state
            .ships
            .remove(&id)
            .map(|_| ())
            .ok_or(SpaceportError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryShipRepository, ShipRepository};
    use crate::domain::{NewShip, ShipType};
    use crate::error::SpaceportError;
    use chrono::{TimeZone, Utc};

    fn new_ship(name: &str) -> NewShip {
        NewShip {
            name: name.to_string(),
            planet: "Venus".to_string(),
            ship_type: ShipType::Transport,
            prod_date: Utc.with_ymd_and_hms(2950, 3, 1, 0, 0, 0).unwrap(),
            used: false,
            speed: 0.4,
            crew_size: 12,
            rating: 0.46,
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let store = InMemoryShipRepository::new();
        let first = store.insert(new_ship("one")).expect("insert");
        let second = store.insert(new_ship("two")).expect("insert");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        let names: Vec<String> = store
            .find_all()
            .expect("find all")
            .into_iter()
            .map(|ship| ship.name)
            .collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = InMemoryShipRepository::new();
        let first = store.insert(new_ship("one")).expect("insert");
        store.delete(first.id).expect("delete");

        let second = store.insert(new_ship("two")).expect("insert");
        assert_eq!(second.id, 2);
        assert_eq!(store.find_by_id(first.id).expect("lookup"), None);
    }

    #[test]
    fn replace_overwrites_existing_row() {
        let store = InMemoryShipRepository::new();
        let mut ship = store.insert(new_ship("one")).expect("insert");
        ship.name = "renamed".to_string();

        store.replace(&ship).expect("replace");

        let stored = store.find_by_id(ship.id).expect("lookup").expect("present");
        assert_eq!(stored.name, "renamed");
    }

    #[test]
    fn missing_rows_report_not_found() {
        let store = InMemoryShipRepository::new();
        let ship = new_ship("ghost").into_ship(9);

        assert_eq!(store.replace(&ship), Err(SpaceportError::NotFound(9)));
        assert_eq!(store.delete(9), Err(SpaceportError::NotFound(9)));
    }
}
