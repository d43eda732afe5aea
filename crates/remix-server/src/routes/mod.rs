pub mod actions;
pub mod health;
pub mod options;
pub mod remix;
