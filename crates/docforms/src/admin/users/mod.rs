//! Staff, officer, and admin accounts.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CreateUser, EmailAddress, EmailError, NewUser, Password, UnknownRole, UpdateUser, User,
    UserChanges, UserId, UserListItem, UserRole,
};
pub use repository::UserRepository;
pub use router::user_router;
pub use service::{UserService, UserServiceError};
