//! Common type definitions

pub mod channel;
pub mod country;

pub use channel::Channel;
pub use country::{default_countries, find_country, Country, NumberLayout};
