pub mod data;
pub mod path;
pub mod scalar;
