//! Data structures: runtime [`Value`]s, [`Number`]s, and [`TypeDesc`] type descriptors.
mod num;
mod ty;
mod val;

pub use num::{IntoIntError, Number, NumberType, ParseNumberError};
pub use ty::{Raw, Shape, TypeDesc};
pub use val::{List, Map, Set, Value};
