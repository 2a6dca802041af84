//! Ship record service: the operations the HTTP layer calls into.

use chrono::Datelike;
use log::{debug, info, warn};

use crate::domain::{NewShip, Ship, ShipDraft};
use crate::error::{InvalidField, Result, SpaceportError};
use crate::filter::ShipCriteria;
use crate::rating::compute_rating;
use crate::storage::ShipRepository;
use crate::validation::{check_patch, first_invalid_field};

/// Used flag applied when a creation payload omits it.
pub const DEFAULT_USED: bool = false;

/// Orchestrates validation, rating and storage for ship records.
#[derive(Debug, Clone)]
pub struct ShipService<R> {
    repository: R,
}

impl<R: ShipRepository> ShipService<R> {
    /// Create a service backed by the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Ships matching the criteria, in storage order.
    pub fn list(&self, criteria: &ShipCriteria) -> Result<Vec<Ship>> {
        let ships = self.repository.find_all()?;
        if criteria.is_unconstrained() {
            debug!("no ship filter supplied, returning all {} records", ships.len());
            return Ok(ships);
        }
        let total = ships.len();
        let matched = criteria.apply(ships);
        debug!("ship filter kept {} of {} records", matched.len(), total);
        Ok(matched)
    }

    /// Number of ships matching the criteria.
    pub fn count(&self, criteria: &ShipCriteria) -> Result<usize> {
        self.list(criteria).map(|ships| ships.len())
    }

    /// Validate a full payload, derive its rating, and persist it.
    pub fn create(&self, draft: ShipDraft) -> Result<Ship> {
        let new_ship = build_new_ship(draft).map_err(|field| {
            warn!("rejected ship creation: invalid {field}");
            SpaceportError::from(field)
        })?;
        let ship = self.repository.insert(new_ship)?;
        info!("created ship {} ({})", ship.id, ship.name);
        Ok(ship)
    }

    /// Look up a ship by its textual identifier.
    pub fn get(&self, id_text: &str) -> Result<Ship> {
        let id = parse_id(id_text)?;
        self.repository
            .find_by_id(id)?
            .ok_or(SpaceportError::NotFound(id))
    }

    /// Apply the supplied fields of `patch` to `existing` and persist the result.
    ///
    /// Every supplied field is validated before any is applied; the first
    /// invalid one rejects the whole update. The rating is recomputed when the
    /// patch touches production date, used flag or speed.
    pub fn update(&self, existing: Ship, patch: &ShipDraft) -> Result<Ship> {
        check_patch(patch).map_err(|field| {
            warn!("rejected update of ship {}: invalid {field}", existing.id);
            SpaceportError::from(field)
        })?;

        let mut ship = existing;
        if patch.is_empty() {
            debug!("update of ship {} supplied no fields", ship.id);
            let saved = self.repository.replace(&ship)?;
            info!("updated ship {}", saved.id);
            return Ok(saved);
        }

        let mut rating_dirty = false;
        if let Some(name) = &patch.name {
            ship.name = name.clone();
        }
        if let Some(planet) = &patch.planet {
            ship.planet = planet.clone();
        }
        if let Some(ship_type) = patch.ship_type {
            ship.ship_type = ship_type;
        }
        if let Some(prod_date) = patch.prod_date {
            ship.prod_date = prod_date;
            rating_dirty = true;
        }
        if let Some(used) = patch.used {
            ship.used = used;
            rating_dirty = true;
        }
        if let Some(speed) = patch.speed {
            ship.speed = speed;
            rating_dirty = true;
        }
        if let Some(crew_size) = patch.crew_size {
            ship.crew_size = crew_size;
        }

        if rating_dirty {
            ship.rating = compute_rating(ship.speed, ship.production_year(), ship.used);
        }

        let saved = self.repository.replace(&ship)?;
        info!("updated ship {}", saved.id);
        Ok(saved)
    }

    /// Remove a ship; fails when it no longer exists.
    pub fn delete(&self, ship: &Ship) -> Result<()> {
        if self.repository.find_by_id(ship.id)?.is_none() {
            return Err(SpaceportError::NotFound(ship.id));
        }
        self.repository.delete(ship.id)?;
        info!("deleted ship {}", ship.id);
        Ok(())
    }
}

/// Parse a positive integer identifier.
pub fn parse_id(id_text: &str) -> Result<i64> {
    match id_text.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(SpaceportError::InvalidId(id_text.to_string())),
    }
}

fn build_new_ship(draft: ShipDraft) -> std::result::Result<NewShip, InvalidField> {
    if let Some(field) = first_invalid_field(&draft) {
        return Err(field);
    }
    let ship_type = draft.ship_type.ok_or(InvalidField::ShipType)?;

    let name = draft.name.ok_or(InvalidField::Name)?;
    let planet = draft.planet.ok_or(InvalidField::Planet)?;
    let prod_date = draft.prod_date.ok_or(InvalidField::ProdDate)?;
    let speed = draft.speed.ok_or(InvalidField::Speed)?;
    let crew_size = draft.crew_size.ok_or(InvalidField::CrewSize)?;
    let used = draft.used.unwrap_or(DEFAULT_USED);

    let rating = compute_rating(speed, prod_date.year(), used);

    Ok(NewShip {
        name,
        planet,
        ship_type,
        prod_date,
        used,
        speed,
        crew_size,
        rating,
    })
}
