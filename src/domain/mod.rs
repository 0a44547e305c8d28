//! Domain modules (vertical slices): types, wire types, conversions, state.

pub mod emission;
pub mod orderbook;
pub mod page;
