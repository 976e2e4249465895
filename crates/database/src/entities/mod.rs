//! Entity definitions for the database layer

pub mod property;
pub mod user;
