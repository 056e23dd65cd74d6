pub mod dto;
pub mod handlers;
pub mod memory;
pub mod repo;

pub use memory::InMemoryUserRepository;
pub use repo::{PgUserRepository, User, UserRepository};
