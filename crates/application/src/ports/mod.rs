pub mod config_checker;
pub mod model_provider;
pub mod package_stager;
pub mod tree_store;

pub use config_checker::ConfigChecker;
pub use model_provider::ModelProvider;
pub use package_stager::{PackageStager, StagedPackage, StagedServerSet};
pub use tree_store::TreeStore;
