pub mod content;
pub mod discover;
pub mod registry;
pub mod run;
pub mod status;
