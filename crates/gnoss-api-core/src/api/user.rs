//! User endpoints

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::GnossClient;
use crate::error::Result;

use super::not_found_as_none;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    pub short_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

/// Body of `user/create-user`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Community to join right after creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_short_name: Option<String>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("community_short_name", &self.community_short_name)
            .finish()
    }
}

#[derive(Serialize)]
struct MembershipBody<'a> {
    user_id: Uuid,
    community_short_name: &'a str,
}

#[derive(Debug, Clone)]
pub struct UserApi {
    client: GnossClient,
}

impl UserApi {
    pub(crate) fn new(client: GnossClient) -> Self {
        Self { client }
    }

    pub fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let id = user_id.to_string();
        not_found_as_none(self.client.get("user/get-user-by-id", &[("user_id", &id)]))
    }

    pub fn get_user_by_short_name(&self, short_name: &str) -> Result<Option<User>> {
        not_found_as_none(
            self.client
                .get("user/get-user-by-short-name", &[("short_name", short_name)]),
        )
    }

    pub fn create_user(&self, user: &NewUser) -> Result<User> {
        let created: User = self.client.post("user/create-user", user)?;
        tracing::info!(user_id = %created.user_id, short_name = %created.short_name, "user created");
        Ok(created)
    }

    pub fn add_user_to_community(&self, user_id: Uuid, community: &str) -> Result<()> {
        self.client.post_unit(
            "user/add-user-to-community",
            &MembershipBody {
                user_id,
                community_short_name: community,
            },
        )
    }
}
