use crate::{
    api::errors::UserApiError,
    db_types::{NewUserRecord, UserRecord},
};

/// Maintenance of the user registry that the admin order board joins against.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Insert the user, or refresh their profile fields if the identity id is already known.
    async fn upsert_user(&self, user: NewUserRecord) -> Result<UserRecord, UserApiError>;

    /// Fetch a user record by provider-side identity id.
    async fn fetch_user(&self, discord_id: &str) -> Result<Option<UserRecord>, UserApiError>;
}
