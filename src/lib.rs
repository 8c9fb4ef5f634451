pub mod network;
pub mod prepare;
pub mod select;
pub mod types;
pub mod weight;
