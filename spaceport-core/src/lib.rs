#![deny(missing_docs)]
//! Spaceport core library.
//!
//! This crate contains the ship domain types together with the validation,
//! rating, filtering and ordering rules that the Spaceport server exposes.

pub mod domain;
pub mod error;
pub mod filter;
pub mod ordering;
pub mod rating;
pub mod service;
pub mod storage;
pub mod validation;

pub use domain::{NewShip, Ship, ShipDraft, ShipType};
pub use error::{InvalidField, Result, SpaceportError};
pub use filter::ShipCriteria;
pub use ordering::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, Page, ShipOrder, sort_ships};
pub use rating::{REFERENCE_YEAR, compute_rating, round_half_up};
pub use service::{DEFAULT_USED, ShipService, parse_id};
pub use storage::{InMemoryShipRepository, ShipRepository};
pub use validation::{check_patch, is_fully_valid};
