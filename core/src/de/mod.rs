pub mod data;
pub mod json;
pub mod query;
