//! Core business logic abstractions

pub mod amount;
pub mod cache;
pub mod config;
pub mod log;
pub mod picker;
pub mod price;
pub mod recent;
pub mod ring;
pub mod search;
pub mod storage;
pub mod sync;
pub mod token;

// Re-export main types for cleaner imports
pub use price::{PriceProvider, Quote, TokenListProvider};
pub use storage::LocalStorage;
pub use token::{Side, Token, TokenPair};
