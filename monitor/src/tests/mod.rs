pub mod cache;
pub mod params;
pub mod scanner;
