pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_MIN_SAMPLES: usize = 1;
/// Nodes with fewer rows than this are always grown on the current thread.
pub const PARALLEL_MIN_ROWS: usize = 1024;
