pub mod appearance;
pub mod dashboard;
pub mod stats;
