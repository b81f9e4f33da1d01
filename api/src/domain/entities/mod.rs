//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod location;

pub use location::{
    resolve_relations, Location, LocationDetails, LocationId, LocationLookup, NewLocation,
};
