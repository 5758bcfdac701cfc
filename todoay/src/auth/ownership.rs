//! Ownership enforcement for user-scoped resources.
//!
//! Every category and todo row has exactly one owner. Handlers fetch the
//! entity first (absent rows are a plain NotFound), then call
//! [`assert_owner`] before any read of private fields or any mutation.
//! A failed check produces [`Error::NotOwner`], which responds as a 404 so
//! callers cannot distinguish "absent" from "not yours".

use uuid::Uuid;

use crate::{
    api::models::users::CurrentUser,
    errors::{Error, Result},
    types::{Resource, UserId},
};

/// A persisted entity with exactly one owning user.
pub trait Owned {
    const RESOURCE: Resource;

    fn id(&self) -> Uuid;
    fn owner_id(&self) -> UserId;
}

/// Verify that `user` owns `entity`.
///
/// Call only after the entity was successfully fetched; a missing entity is
/// NotFound, not an ownership failure.
pub fn assert_owner<T: Owned>(user: &CurrentUser, entity: &T) -> Result<()> {
    if entity.owner_id() == user.id {
        Ok(())
    } else {
        Err(Error::NotOwner {
            resource: T::RESOURCE,
            id: entity.id(),
        })
    }
}
