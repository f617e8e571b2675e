pub mod operations;

// Re-export commonly used items
pub use operations::*;
