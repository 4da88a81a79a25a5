pub mod config;
pub mod discovery;
pub mod error;
pub mod interpreter;
pub mod io;
pub mod paths;
pub mod project;
pub mod registry;
pub mod store;
pub mod templates;

pub use error::{DashError, Result};
