/// Processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Denoising,
    Aligning,
    Subtracting,
    Clipping,
    Equalizing,
    Encoding,
    Writing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading images"),
            Self::Denoising => write!(f, "Denoising frames"),
            Self::Aligning => write!(f, "Aligning frames"),
            Self::Subtracting => write!(f, "Subtracting background"),
            Self::Clipping => write!(f, "Clipping intensities"),
            Self::Equalizing => write!(f, "Equalizing contrast"),
            Self::Encoding => write!(f, "Encoding animation"),
            Self::Writing => write!(f, "Writing frames"),
        }
    }
}

/// Progress reporting for the load/correct/export routines.
///
/// Implementors can use this to drive progress bars or any other UI
/// feedback; the numeric routines stay pure functions of their inputs.
/// All methods have default no-op implementations.
pub trait ProgressReporter {
    /// A new stage has started. `total_items` is the number of work items
    /// in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: Stage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
