pub mod aggregate;
pub mod annotation;
pub mod compare;
pub mod config;
pub mod error;
pub mod filter;
pub mod index;
pub mod load;
pub mod model;
pub mod verdict;
pub mod walker;
