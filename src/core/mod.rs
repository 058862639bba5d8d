pub mod network;
pub mod tasks;
