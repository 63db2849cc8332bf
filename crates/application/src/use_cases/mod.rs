pub mod export;
pub mod validation;

// Re-export use cases
pub use export::{ExportSettings, ExportTreeUseCase};
pub use validation::CheckConfigUseCase;
