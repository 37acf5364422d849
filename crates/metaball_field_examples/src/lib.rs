#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{init_tracing, render_slice_to_png, SliceConfig, SliceEngine};
