//! Scan loop and its shutdown plumbing.

pub mod runner;
pub mod shutdown;

pub use runner::Scanner;
pub use shutdown::{ShutdownHandle, ShutdownSignal, shutdown_channel};
