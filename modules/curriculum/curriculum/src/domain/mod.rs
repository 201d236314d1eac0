pub mod error;
pub mod fields;
pub mod policy;
pub mod repos;
pub mod service;
