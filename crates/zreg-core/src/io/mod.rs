pub mod discover;
pub mod layout;
pub mod tiff_stack;

pub use discover::{discover_inputs, output_file_name};
pub use layout::{AcquisitionLayout, BucketFrames};
pub use tiff_stack::{load_volume, read_pages, write_stack};
