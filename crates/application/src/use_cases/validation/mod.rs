pub mod check_config;

pub use check_config::CheckConfigUseCase;
