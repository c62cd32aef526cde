mod descriptors;
pub mod report_descriptors;

pub use descriptors::*;
