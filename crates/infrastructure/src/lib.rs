//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_task_repository;
mod in_memory_user_repository;
mod jwt_session_token_codec;
mod postgres_task_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_task_repository::InMemoryTaskRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use jwt_session_token_codec::JwtSessionTokenCodec;
pub use postgres_task_repository::PostgresTaskRepository;
pub use postgres_user_repository::PostgresUserRepository;
