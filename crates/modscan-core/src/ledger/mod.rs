pub mod model;
pub mod parse;
pub mod replace;
