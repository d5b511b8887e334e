//! Domain models for the lunchbox ordering core.

pub mod cart;
pub mod catalog;
pub mod custom_meal;
pub mod family;
pub mod order;
