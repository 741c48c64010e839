pub mod capture_flow;

pub use capture_flow::{run_capture_flow, CaptureOutcome};
