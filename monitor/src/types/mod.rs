pub mod alert;
pub mod block;
pub mod constant;
pub mod job;
pub mod params;
pub mod report;
