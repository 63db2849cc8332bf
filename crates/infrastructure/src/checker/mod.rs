pub mod bind_checker;

pub use bind_checker::BindConfigChecker;
