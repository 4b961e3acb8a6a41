//! Value normalization functions.
//!
//! Pure functions that turn raw cell text into canonical values.

pub mod numeric;
