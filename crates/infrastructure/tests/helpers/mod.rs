#![allow(dead_code)]
pub mod builders;
pub mod scripts;

pub use builders::ModelSeed;
pub use scripts::write_script;
