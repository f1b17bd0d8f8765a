//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits.

mod in_memory;

pub use in_memory::InMemoryRepository;
