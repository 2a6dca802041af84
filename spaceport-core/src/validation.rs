//! Field-level validity rules for ship payloads.

use chrono::{DateTime, Datelike, Utc};

use crate::domain::ShipDraft;
use crate::error::InvalidField;

/// Maximum length of name and planet, in characters.
pub const MAX_TEXT_LEN: usize = 50;
/// Exclusive lower bound on the production year.
pub const MIN_PRODUCTION_YEAR: i32 = 2800;
/// Exclusive upper bound on the production year.
pub const MAX_PRODUCTION_YEAR: i32 = 3019;
/// Inclusive lower bound on speed.
pub const MIN_SPEED: f64 = 0.01;
/// Inclusive upper bound on speed.
pub const MAX_SPEED: f64 = 0.99;
/// Inclusive lower bound on crew size.
pub const MIN_CREW_SIZE: i32 = 1;
/// Inclusive upper bound on crew size.
pub const MAX_CREW_SIZE: i32 = 9999;

/// Inclusive range check where either bound may be absent.
pub fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

/// Strict range check where either bound may be absent.
pub fn strictly_between<T: PartialOrd>(value: T, after: Option<T>, before: Option<T>) -> bool {
    after.is_none_or(|after| value > after) && before.is_none_or(|before| value < before)
}

/// Non-empty text no longer than [`MAX_TEXT_LEN`] characters.
pub fn is_text_valid(value: Option<&str>) -> bool {
    value.is_some_and(|text| !text.is_empty() && text.chars().count() <= MAX_TEXT_LEN)
}

/// Name validity.
pub fn is_name_valid(name: Option<&str>) -> bool {
    is_text_valid(name)
}

/// Planet validity.
pub fn is_planet_valid(planet: Option<&str>) -> bool {
    is_text_valid(planet)
}

/// Production date validity: the year must lie strictly between
/// [`MIN_PRODUCTION_YEAR`] and [`MAX_PRODUCTION_YEAR`].
pub fn is_prod_date_valid(prod_date: Option<DateTime<Utc>>) -> bool {
    prod_date.is_some_and(|date| {
        strictly_between(
            date.year(),
            Some(MIN_PRODUCTION_YEAR),
            Some(MAX_PRODUCTION_YEAR),
        )
    })
}

/// Speed validity.
pub fn is_speed_valid(speed: Option<f64>) -> bool {
    speed.is_some_and(|speed| within(speed, Some(MIN_SPEED), Some(MAX_SPEED)))
}

/// Crew size validity.
pub fn is_crew_size_valid(crew_size: Option<i32>) -> bool {
    crew_size.is_some_and(|crew| within(crew, Some(MIN_CREW_SIZE), Some(MAX_CREW_SIZE)))
}

/// Conjunction of the five field predicates.
pub fn is_fully_valid(draft: &ShipDraft) -> bool {
    first_invalid_field(draft).is_none()
}

/// First field, in declaration order, that fails its predicate.
pub fn first_invalid_field(draft: &ShipDraft) -> Option<InvalidField> {
    if !is_name_valid(draft.name.as_deref()) {
        return Some(InvalidField::Name);
    }
    if !is_planet_valid(draft.planet.as_deref()) {
        return Some(InvalidField::Planet);
    }
    if !is_prod_date_valid(draft.prod_date) {
        return Some(InvalidField::ProdDate);
    }
    if !is_speed_valid(draft.speed) {
        return Some(InvalidField::Speed);
    }
    if !is_crew_size_valid(draft.crew_size) {
        return Some(InvalidField::CrewSize);
    }
    None
}

/// Validate only the fields present in a patch, in update order.
///
/// Absent fields are not checked. Ship type and used flag carry no rule.
pub fn check_patch(patch: &ShipDraft) -> Result<(), InvalidField> {
    if patch.name.is_some() && !is_name_valid(patch.name.as_deref()) {
        return Err(InvalidField::Name);
    }
    if patch.planet.is_some() && !is_planet_valid(patch.planet.as_deref()) {
        return Err(InvalidField::Planet);
    }
    if patch.prod_date.is_some() && !is_prod_date_valid(patch.prod_date) {
        return Err(InvalidField::ProdDate);
    }
    if patch.speed.is_some() && !is_speed_valid(patch.speed) {
        return Err(InvalidField::Speed);
    }
    if patch.crew_size.is_some() && !is_crew_size_valid(patch.crew_size) {
        return Err(InvalidField::CrewSize);
    }
    Ok(())
}
