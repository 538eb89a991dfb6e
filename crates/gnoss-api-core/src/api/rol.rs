//! Community role endpoints

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::GnossClient;
use crate::error::Result;

use super::require_scope;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rol {
    pub rol_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `rol/create-rol`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRol {
    pub community_short_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize)]
struct RolAssignment<'a> {
    community_short_name: &'a str,
    rol_id: Uuid,
    user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct RolApi {
    client: GnossClient,
}

impl RolApi {
    pub(crate) fn new(client: GnossClient) -> Self {
        Self { client }
    }

    pub fn get_roles(&self, community: &str) -> Result<Vec<Rol>> {
        require_scope(
            self.client
                .get("rol/get-roles", &[("community_short_name", community)]),
            community,
        )
    }

    /// Create a role and return its id
    pub fn create_rol(&self, rol: &NewRol) -> Result<Uuid> {
        self.client.post("rol/create-rol", rol)
    }

    pub fn assign_rol(&self, community: &str, rol_id: Uuid, user_id: Uuid) -> Result<()> {
        self.client.post_unit(
            "rol/assign-rol",
            &RolAssignment {
                community_short_name: community,
                rol_id,
                user_id,
            },
        )
    }

    pub fn remove_rol(&self, community: &str, rol_id: Uuid, user_id: Uuid) -> Result<()> {
        self.client.post_unit(
            "rol/remove-rol",
            &RolAssignment {
                community_short_name: community,
                rol_id,
                user_id,
            },
        )
    }
}
