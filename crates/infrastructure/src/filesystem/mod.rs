pub mod package_stager;
pub mod tree_store;

pub use package_stager::{TarPackageStager, STAGE_DIR};
pub use tree_store::FsTreeStore;
