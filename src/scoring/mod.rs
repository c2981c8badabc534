pub mod accuracy;
pub mod batch;
pub mod diagnostics;
pub mod fluency;
pub mod report;
