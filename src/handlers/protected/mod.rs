// handlers/protected/mod.rs - Handlers that act on behalf of an authenticated caller
//
// Every handler here resolves the caller itself, first, before touching the
// path or the body. There is no auth middleware in front of these routes:
// each handler owns its unauthenticated error code.

pub mod decks;

pub use decks::*;
