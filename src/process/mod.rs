//! External transcoder processes
//!
//! Media never passes through this service. Each relayed stream is an
//! opaque `ffmpeg` child whose process state is the only thing observed.

pub mod handle;
pub mod launcher;

pub use handle::{ProcessHandle, ProcessStatus};
pub use launcher::{FfmpegLauncher, ProcessLauncher, TranscodeJob};
