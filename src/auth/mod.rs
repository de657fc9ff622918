//! Authentication: registration, password login and bearer tokens.
//!
//! Every protected handler receives the authenticated user explicitly as a
//! [`Caller`] extracted from the `Authorization: Bearer` header.

pub mod context;
pub mod handlers;
mod password;
mod service;

pub use context::Caller;
pub use service::{AuthService, Claims, Registration};
