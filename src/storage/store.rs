use std::future::Future;

use super::error::StoreError;
use super::types::{User, UserId, UserPatch, Users};

/// Durable CRUD over the user record set.
///
/// Every call is an independent unit of work: implementations load the current
/// state, apply at most one mutation and persist it before resolving. Errors
/// are returned untouched; logging them is the caller's business. Once a cycle
/// has started it must finish even if the returned future is dropped.
pub trait UserStore: Send + Sync + 'static {
    /// All users, keyed by id.
    fn list(&self) -> impl Future<Output = Result<Users, StoreError>> + Send;

    /// Stores `user` under a freshly minted id and returns that id.
    fn add(&self, user: User) -> impl Future<Output = Result<UserId, StoreError>> + Send;

    /// The user stored under `id`.
    fn get(&self, id: &UserId) -> impl Future<Output = Result<User, StoreError>> + Send;

    /// Merges `patch` into the stored user and returns the result.
    fn update(
        &self,
        id: &UserId,
        patch: UserPatch,
    ) -> impl Future<Output = Result<User, StoreError>> + Send;

    /// Removes the user stored under `id`.
    fn delete(&self, id: &UserId) -> impl Future<Output = Result<(), StoreError>> + Send;
}
