pub mod block;

pub use block::{FrameAncillary, SampleFrame};
