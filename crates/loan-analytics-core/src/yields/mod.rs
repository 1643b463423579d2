pub mod portfolio;
pub mod segmentation;
pub mod trend;
