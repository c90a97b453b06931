pub mod read;
pub mod regions;
