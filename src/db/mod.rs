//! Entity store for users, stores and check-in codes.
//!
//! Persistence sits behind the traits in [`repository`]; [`DbOperations`]
//! talks to PostgreSQL and [`MemoryRepository`] keeps everything in process.

pub mod memory;
pub mod models;
pub mod operations;
pub mod repository;

pub use memory::MemoryRepository;
pub use models::{Code, Store, StoreAttributes, User};
pub use operations::DbOperations;
pub use repository::{CodeRepo, StoreRepo, UserRepo};
