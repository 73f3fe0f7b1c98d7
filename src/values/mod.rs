//! State-value storage and persistence

pub mod serialization;
pub mod store;

pub use serialization::{ValueSnapshot, load, load_or_empty, save};
pub use store::{Averaging, Entry, Initializer, ValueStore};
