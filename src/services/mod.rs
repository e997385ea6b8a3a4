pub mod export_manager;

pub use export_manager::{
    create_encoder, discard_partial_output, ExportManager, JobState, JobStatus,
};
