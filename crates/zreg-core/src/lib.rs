pub mod align;
pub mod compute;
pub mod consts;
pub mod denoise;
pub mod depth;
pub mod error;
pub mod frame;
pub mod io;
pub mod lineoffset;
pub mod pipeline;
pub mod stack;
pub mod table;
