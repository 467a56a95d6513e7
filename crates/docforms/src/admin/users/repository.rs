use super::domain::{EmailAddress, NewUser, UpdateUser, User, UserId, UserListItem};
use crate::admin::repository::RepositoryError;

/// Storage abstraction for accounts. Email uniqueness must also hold at this layer.
pub trait UserRepository: Send + Sync {
    fn find_all(&self) -> Result<Vec<UserListItem>, RepositoryError>;
    fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
    fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepositoryError>;
    fn create(&self, user: NewUser) -> Result<User, RepositoryError>;
    fn update(&self, update: UpdateUser) -> Result<User, RepositoryError>;
    fn delete(&self, id: &UserId) -> Result<(), RepositoryError>;
}
