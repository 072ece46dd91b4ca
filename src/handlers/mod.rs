// handlers/mod.rs
//
// Public endpoints (service descriptor, health) live next to the router.
// Everything under /api is in `protected`.
pub mod protected;

pub use protected::*;
