pub mod export_tree;

pub use export_tree::{ExportSettings, ExportTreeUseCase};
