pub mod audit;
pub mod batch;
pub mod collection;
pub mod config;
pub mod error;
pub mod identity;
pub mod info;
pub mod io;
pub mod lifecycle;
pub mod listing;
pub mod package;
pub mod paths;
pub mod repository;
pub mod types;

pub use error::{PkgdbError, Result};
