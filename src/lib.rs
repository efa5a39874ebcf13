pub mod cli;
pub mod logging;
pub mod script;

// Re-exported so scripts and callers share one container crate.
pub use seqvec;
