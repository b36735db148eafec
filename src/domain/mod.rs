//! Domain layer - Pure business abstractions
//!
//! Grid geometry, the error taxonomy and the plain input/output types.
//! No HTTP types live here.

pub mod errors;
pub mod grid;
pub mod inputs;

pub use errors::DomainError;
pub use grid::{Grid, Slot};
pub use inputs::*;
