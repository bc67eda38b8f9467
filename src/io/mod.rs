pub mod catalog;
pub mod recorder;
pub mod reporting;
