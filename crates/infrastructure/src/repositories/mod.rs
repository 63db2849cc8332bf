pub mod model_repository;

pub use model_repository::SqliteModelRepository;
