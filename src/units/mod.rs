//! Subsystem for reading quantity literals (byte sizes and time
//! durations) and converting them between units.

pub mod byte_size;
pub mod error;
pub mod quantity;
pub mod system;
pub mod time_duration;

pub use byte_size::{ByteSize, ByteUnits};
pub use error::ParseError;
pub use quantity::{Quantity, QuantityLiteral};
pub use system::UnitSystem;
pub use time_duration::{DurationUnits, TimeDuration};
