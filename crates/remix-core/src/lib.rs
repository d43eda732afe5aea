pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod io;
pub mod paths;
pub mod pipeline;
pub mod prompt;
pub mod record;
pub mod script;
pub mod selector;
pub mod store;

pub use error::{RemixError, Result};
