pub mod archive;
pub mod elements;
