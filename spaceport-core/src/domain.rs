//! Domain entities for Spaceport.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of ship categories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    /// Cargo and passenger carriers.
    Transport,
    /// Armed vessels.
    Military,
    /// Trading vessels.
    Merchant,
}

impl ShipType {
    /// All ship types in declaration order.
    pub const ALL: [ShipType; 3] = [ShipType::Transport, ShipType::Military, ShipType::Merchant];

    /// Stable wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ShipType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown ship type: {value}"))
    }
}

/// A persisted ship record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship category.
    pub ship_type: ShipType,
    /// Production timestamp, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub prod_date: DateTime<Utc>,
    /// Whether the ship has had previous owners.
    #[serde(rename = "isUsed")]
    pub used: bool,
    /// Top speed as a fraction of light speed.
    pub speed: f64,
    /// Number of crew members.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl Ship {
    /// Calendar year of the production date.
    pub fn production_year(&self) -> i32 {
        self.prod_date.year()
    }
}

/// A validated ship that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShip {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship category.
    pub ship_type: ShipType,
    /// Production timestamp.
    pub prod_date: DateTime<Utc>,
    /// Whether the ship has had previous owners.
    pub used: bool,
    /// Top speed.
    pub speed: f64,
    /// Number of crew members.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl NewShip {
    /// Attach a storage-assigned identifier.
    pub fn into_ship(self, id: i64) -> Ship {
        Ship {
            id,
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            prod_date: self.prod_date,
            used: self.used,
            speed: self.speed,
            crew_size: self.crew_size,
            rating: self.rating,
        }
    }
}

/// Caller-supplied ship payload used for creation and partial updates.
///
/// Every field is optional; an absent field in an update means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipDraft {
    /// Ship name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Home planet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Ship category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Production timestamp in epoch milliseconds.
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<DateTime<Utc>>,
    /// Whether the ship has had previous owners.
    #[serde(rename = "isUsed", skip_serializing_if = "Option::is_none")]
    pub used: Option<bool>,
    /// Top speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Number of crew members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew_size: Option<i32>,
}

impl ShipDraft {
    /// Returns true when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.planet.is_none()
            && self.ship_type.is_none()
            && self.prod_date.is_none()
            && self.used.is_none()
            && self.speed.is_none()
            && self.crew_size.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{Ship, ShipDraft, ShipType};
    use chrono::{TimeZone, Utc};

    #[test]
    fn ship_type_parses_case_insensitively() {
        assert_eq!("merchant".parse::<ShipType>(), Ok(ShipType::Merchant));
        assert_eq!(" MILITARY ".parse::<ShipType>(), Ok(ShipType::Military));
        assert!("freighter".parse::<ShipType>().is_err());
    }

    #[test]
    fn ship_serializes_with_wire_names() {
        let ship = Ship {
            id: 3,
            name: "Orion III".to_string(),
            planet: "Mars".to_string(),
            ship_type: ShipType::Merchant,
            prod_date: Utc.with_ymd_and_hms(2995, 1, 1, 0, 0, 0).unwrap(),
            used: true,
            speed: 0.82,
            crew_size: 617,
            rating: 1.31,
        };

        let value = serde_json::to_value(&ship).expect("serialize ship");

        assert_eq!(value["shipType"], "MERCHANT");
        assert_eq!(value["isUsed"], true);
        assert_eq!(value["crewSize"], 617);
        assert_eq!(
            value["prodDate"],
            ship.prod_date.timestamp_millis(),
            "prodDate is epoch millis"
        );
    }

    #[test]
    fn draft_accepts_partial_payload() {
        let draft: ShipDraft =
            serde_json::from_str(r#"{"name":"Daedalus","speed":0.5}"#).expect("parse draft");

        assert_eq!(draft.name.as_deref(), Some("Daedalus"));
        assert_eq!(draft.speed, Some(0.5));
        assert!(draft.prod_date.is_none());
        assert!(draft.used.is_none());
        assert!(!draft.is_empty());
        assert!(ShipDraft::default().is_empty());
    }

    #[test]
    fn draft_reads_epoch_millis() {
        let millis = Utc
            .with_ymd_and_hms(2900, 6, 15, 0, 0, 0)
            .unwrap()
            .timestamp_millis();
        let payload = format!(r#"{{"prodDate":{millis},"isUsed":false}}"#);
        let draft: ShipDraft = serde_json::from_str(&payload).expect("parse draft");

        assert_eq!(draft.prod_date.map(|date| date.timestamp_millis()), Some(millis));
        assert_eq!(draft.used, Some(false));
    }
}
