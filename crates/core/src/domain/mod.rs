pub mod estimate;
pub mod features;
pub mod report;
pub mod weather;
