//! Database models for Spaceport server.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use spaceport_core::{NewShip, Ship, SpaceportError};

use crate::schema::ships;

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, AsChangeset)]
#[diesel(table_name = ships)]
/// Ship database record.
pub struct ShipRecord {
    /// Ship identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship type label.
    pub ship_type: String,
    /// Production timestamp (UTC).
    pub prod_date: NaiveDateTime,
    /// Whether the ship is used.
    pub is_used: bool,
    /// Top speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ships)]
/// Insertable ship record.
pub struct NewShipRecord {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship type label.
    pub ship_type: String,
    /// Production timestamp (UTC).
    pub prod_date: NaiveDateTime,
    /// Whether the ship is used.
    pub is_used: bool,
    /// Top speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl From<&Ship> for ShipRecord {
    fn from(ship: &Ship) -> Self {
        Self {
            id: ship.id,
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date.naive_utc(),
            is_used: ship.used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

impl From<NewShip> for NewShipRecord {
    fn from(ship: NewShip) -> Self {
        Self {
            name: ship.name,
            planet: ship.planet,
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date.naive_utc(),
            is_used: ship.used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

impl TryFrom<ShipRecord> for Ship {
    type Error = SpaceportError;

    fn try_from(record: ShipRecord) -> Result<Self, Self::Error> {
        let ship_type = record.ship_type.parse().map_err(|err: String| {
            SpaceportError::Storage(format!("ship {} has {err}", record.id))
        })?;
        Ok(Ship {
            id: record.id,
            name: record.name,
            planet: record.planet,
            ship_type,
            prod_date: record.prod_date.and_utc(),
            used: record.is_used,
            speed: record.speed,
            crew_size: record.crew_size,
            rating: record.rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{NewShipRecord, ShipRecord};
    use chrono::{TimeZone, Utc};
    use spaceport_core::{NewShip, Ship, ShipType, SpaceportError};

    fn ship() -> Ship {
        Ship {
            id: 5,
            name: "Nostromo".to_string(),
            planet: "Thedus".to_string(),
            ship_type: ShipType::Transport,
            prod_date: Utc.with_ymd_and_hms(2990, 8, 1, 10, 0, 0).unwrap(),
            used: true,
            speed: 0.31,
            crew_size: 7,
            rating: 0.41,
        }
    }

    #[test]
    fn record_conversion_keeps_fields() {
        let record = ShipRecord::from(&ship());
        assert_eq!(record.ship_type, "TRANSPORT");
        assert!(record.is_used);

        let restored = Ship::try_from(record).expect("convert record");
        assert_eq!(restored, ship());
    }

    #[test]
    fn new_record_drops_nothing_but_id() {
        let new_ship = NewShip {
            name: "Eagle".to_string(),
            planet: "Moon".to_string(),
            ship_type: ShipType::Military,
            prod_date: Utc.with_ymd_and_hms(2901, 1, 1, 0, 0, 0).unwrap(),
            used: false,
            speed: 0.5,
            crew_size: 2,
            rating: 0.34,
        };
        let record = NewShipRecord::from(new_ship.clone());
        assert_eq!(record.ship_type, "MILITARY");
        assert_eq!(record.prod_date, new_ship.prod_date.naive_utc());
        assert_eq!(record.rating, 0.34);
    }

    #[test]
    fn unknown_ship_type_is_a_storage_error() {
        let mut record = ShipRecord::from(&ship());
        record.ship_type = "YACHT".to_string();

        match Ship::try_from(record) {
            Err(SpaceportError::Storage(message)) => assert!(message.contains("YACHT")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }
}
