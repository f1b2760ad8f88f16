pub mod dynamodb;
pub mod error;
pub mod memory;
pub mod models;
pub mod s3;
pub mod todo_repository;
pub mod todo_service;

pub use dynamodb::*;
pub use memory::InMemoryTodoRepository;
pub use s3::S3AttachmentStorage;
pub use todo_repository::DynamoDbTodoRepository;
pub use todo_service::TodoService;
