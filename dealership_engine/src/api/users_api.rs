use std::fmt::Debug;

use log::*;

use crate::{
    api::errors::UserApiError,
    db_types::{NewUserRecord, UserRecord},
    traits::UserManagement,
};

/// Maintenance of the user registry.
pub struct UserApi<B> {
    db: B,
}

impl<B> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi")
    }
}

impl<B> UserApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    /// Insert or refresh the user's profile. Called on every successful login so that the admin
    /// order board always joins against current usernames and avatars.
    pub async fn upsert_user(&self, user: NewUserRecord) -> Result<UserRecord, UserApiError> {
        let record = self.db.upsert_user(user).await?;
        trace!("👥️ Refreshed user record for {} ({})", record.username, record.discord_id);
        Ok(record)
    }

    pub async fn fetch_user(&self, discord_id: &str) -> Result<Option<UserRecord>, UserApiError> {
        self.db.fetch_user(discord_id).await
    }
}
