pub mod outputs;
pub mod persistence;
