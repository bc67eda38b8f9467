pub mod run;
pub mod supplier;
pub mod weights;
