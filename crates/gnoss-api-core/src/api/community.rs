//! Community endpoints

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::{Category, CategoryDirectory, CategorySource};
use crate::client::GnossClient;
use crate::error::Result;

use super::require_scope;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityInfo {
    pub community_id: Uuid,
    pub short_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: Uuid,
    pub short_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Serialize)]
struct CreateCategoryBody<'a> {
    community_short_name: &'a str,
    category_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_category_id: Option<Uuid>,
}

#[derive(Serialize)]
struct RenameCategoryBody<'a> {
    community_short_name: &'a str,
    category_id: Uuid,
    new_category_name: &'a str,
}

#[derive(Serialize)]
struct MoveCategoryBody<'a> {
    community_short_name: &'a str,
    category_id: Uuid,
    parent_category_id: Option<Uuid>,
}

#[derive(Serialize)]
struct DeleteCategoryBody<'a> {
    community_short_name: &'a str,
    category_id: Uuid,
}

/// Community endpoints.
///
/// Category mutations do not touch any [`CategoryCache`](crate::category::CategoryCache);
/// callers holding one must invalidate the community afterwards.
#[derive(Debug, Clone)]
pub struct CommunityApi {
    client: GnossClient,
}

impl CommunityApi {
    pub(crate) fn new(client: GnossClient) -> Self {
        Self { client }
    }

    pub fn get_community_info(&self, community: &str) -> Result<CommunityInfo> {
        require_scope(
            self.client.get(
                "community/get-community-info",
                &[("community_short_name", community)],
            ),
            community,
        )
    }

    /// Flat category directory of a community.
    ///
    /// An empty list is a valid, empty thesaurus; `404` or no body at all
    /// means the community does not exist.
    pub fn get_categories(&self, community: &str) -> Result<CategoryDirectory> {
        let categories: Vec<Category> = require_scope(
            self.client.get(
                "community/get-categories",
                &[("community_short_name", community)],
            ),
            community,
        )?;
        tracing::debug!(community, count = categories.len(), "fetched category directory");
        Ok(CategoryDirectory::new(community, categories))
    }

    /// Create a category and return its id. `None` creates a root.
    pub fn create_category(&self, community: &str, name: &str, parent: Option<Uuid>) -> Result<Uuid> {
        self.client.post(
            "community/create-category",
            &CreateCategoryBody {
                community_short_name: community,
                category_name: name,
                parent_category_id: parent,
            },
        )
    }

    pub fn change_category_name(&self, community: &str, category_id: Uuid, new_name: &str) -> Result<()> {
        self.client.post_unit(
            "community/change-category-name",
            &RenameCategoryBody {
                community_short_name: community,
                category_id,
                new_category_name: new_name,
            },
        )
    }

    /// Reparent a category. `None` turns it into a root.
    pub fn move_category(&self, community: &str, category_id: Uuid, new_parent: Option<Uuid>) -> Result<()> {
        self.client.post_unit(
            "community/move-category",
            &MoveCategoryBody {
                community_short_name: community,
                category_id,
                parent_category_id: new_parent,
            },
        )
    }

    pub fn delete_category(&self, community: &str, category_id: Uuid) -> Result<()> {
        self.client.post_unit(
            "community/delete-category",
            &DeleteCategoryBody {
                community_short_name: community,
                category_id,
            },
        )
    }

    pub fn get_members(&self, community: &str) -> Result<Vec<Member>> {
        require_scope(
            self.client.get(
                "community/get-members",
                &[("community_short_name", community)],
            ),
            community,
        )
    }
}

impl CategorySource for CommunityApi {
    fn fetch_categories(&self, scope: &str) -> Result<CategoryDirectory> {
        self.get_categories(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryTree;
    use crate::error::{GnossApiError, TransportError};
    use crate::http::mock::{test_client, MockTransport};
    use crate::http::HttpMethod;

    const TECH: &str = "00000000-0000-0000-0000-000000000001";
    const AI: &str = "00000000-0000-0000-0000-000000000002";

    fn directory_body() -> String {
        format!(
            r#"[
                {{"category_id": "{TECH}", "category_name": "Tech@en|||Tecnología@es", "parent_category_id": null}},
                {{"category_id": "{AI}", "category_name": "AI", "parent_category_id": "{TECH}"}}
            ]"#
        )
    }

    #[test]
    fn test_get_categories_decodes_directory() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Get, "community/get-categories", 200, &directory_body());
        let api = test_client(&transport).community();

        let directory = api.get_categories("my community").unwrap();
        assert_eq!(directory.scope(), "my community");
        assert_eq!(directory.len(), 2);

        let tree = CategoryTree::build(directory);
        assert_eq!(tree.roots().count(), 1);
        assert_eq!(
            tree.resolve_flat(&["Tecnología"]).unwrap(),
            vec![Uuid::parse_str(TECH).unwrap()]
        );

        let request = &transport.requests()[0];
        assert_eq!(request.url.query(), Some("community_short_name=my+community"));
    }

    #[test]
    fn test_empty_list_is_valid_directory() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Get, "community/get-categories", 200, "[]");
        let api = test_client(&transport).community();

        let directory = api.get_categories("empty").unwrap();
        assert!(directory.is_empty());
    }

    #[test]
    fn test_unknown_community_is_scope_not_found() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Get, "community/get-categories", 404, "not found");
        let api = test_client(&transport).community();

        let err = api.fetch_categories("ghost").unwrap_err();
        assert!(matches!(err, GnossApiError::ScopeNotFound { scope } if scope == "ghost"));
    }

    #[test]
    fn test_null_body_is_scope_not_found() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Get, "community/get-categories", 200, "null");
        let api = test_client(&transport).community();

        assert!(matches!(
            api.get_categories("ghost"),
            Err(GnossApiError::ScopeNotFound { .. })
        ));
    }

    #[test]
    fn test_server_error_stays_transport() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Get, "community/get-categories", 500, "boom");
        let api = test_client(&transport).community();

        let err = api.get_categories("c").unwrap_err();
        assert!(matches!(
            err,
            GnossApiError::Transport(TransportError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_create_category_sends_parent() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Post, "community/create-category", 200, &format!("\"{AI}\""));
        let api = test_client(&transport).community();

        let parent = Uuid::parse_str(TECH).unwrap();
        let id = api.create_category("c", "AI", Some(parent)).unwrap();
        assert_eq!(id, Uuid::parse_str(AI).unwrap());

        let body: serde_json::Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["category_name"], "AI");
        assert_eq!(body["parent_category_id"], TECH);
    }

    #[test]
    fn test_move_category_to_root_sends_null_parent() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Post, "community/move-category", 200, "");
        let api = test_client(&transport).community();

        api.move_category("c", Uuid::parse_str(AI).unwrap(), None).unwrap();
        let body: serde_json::Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert!(body["parent_category_id"].is_null());
    }

    #[test]
    fn test_get_members() {
        let transport = MockTransport::new();
        transport.reply(
            HttpMethod::Get,
            "community/get-members",
            200,
            &format!(r#"[{{"user_id": "{AI}", "short_name": "ana"}}]"#),
        );
        let api = test_client(&transport).community();

        let members = api.get_members("c").unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].short_name, "ana");
        assert_eq!(members[0].name, "");
    }
}
