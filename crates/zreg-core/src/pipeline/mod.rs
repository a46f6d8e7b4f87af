pub mod config;
mod intra;
mod orchestrator;
mod types;

pub use intra::{process_file, FileOutput};
pub use orchestrator::{
    align_depths, run_pipeline, run_pipeline_reported, run_pipeline_with, write_outputs,
    AlignedDepths,
};
pub use types::{
    DepthRecord, FileFailure, NoOpReporter, PipelineStage, ProgressReporter, QualityWarning,
    RegistrationReport,
};
