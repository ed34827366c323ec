//! Domain layer
//!
//! Pure authorization rules. No I/O, no shared state.

pub mod policy;
pub mod value_object;
