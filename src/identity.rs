use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::access::Role;

/// ProvisionUserRequest
///
/// The account data mirrored to the identity provider when a teacher,
/// student or parent record is created or updated. The password never
/// touches the local database; `None` on update means "leave unchanged".
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionUserRequest {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// IdentityService
///
/// Abstract contract for the identity provider's user-management API. The
/// HTTP client talks to the real provider; the mock stands in during tests,
/// mirroring how the repository is swapped.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Provisions a new account and returns the provider-assigned user id,
    /// which becomes the primary key of the mirrored local row.
    async fn create_user(&self, req: &ProvisionUserRequest) -> Result<String, String>;

    /// Pushes username/name/password changes for an existing account.
    async fn update_user(&self, id: &str, req: &ProvisionUserRequest) -> Result<(), String>;

    /// Removes the account. Called before the local row is deleted.
    async fn delete_user(&self, id: &str) -> Result<(), String>;
}

/// IdentityState
///
/// The concrete type used to share the identity layer across the
/// application state.
pub type IdentityState = Arc<dyn IdentityService>;

/// Minimal deserialization target for the provider's user responses; only
/// the canonical id is consumed.
#[derive(Deserialize)]
struct ProviderUser {
    id: String,
}

/// HttpIdentityClient
///
/// The concrete implementation calling the provider's management REST API
/// with the server-side API key from AppConfig.
pub struct HttpIdentityClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentityClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/v1/users", self.base_url)
    }
}

#[async_trait]
impl IdentityService for HttpIdentityClient {
    async fn create_user(&self, req: &ProvisionUserRequest) -> Result<String, String> {
        let response = self
            .client
            .post(self.users_url())
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await
            .map_err(|e| format!("identity create request failed: {e}"))?;

        if !response.status().is_success() {
            // Duplicate username, weak password, etc. The provider's reason
            // is logged, not surfaced.
            return Err(format!("identity create rejected: {}", response.status()));
        }

        let user = response
            .json::<ProviderUser>()
            .await
            .map_err(|e| format!("identity create response malformed: {e}"))?;
        Ok(user.id)
    }

    async fn update_user(&self, id: &str, req: &ProvisionUserRequest) -> Result<(), String> {
        let response = self
            .client
            .patch(format!("{}/{}", self.users_url(), id))
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await
            .map_err(|e| format!("identity update request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("identity update rejected: {}", response.status()));
        }
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<(), String> {
        let response = self
            .client
            .delete(format!("{}/{}", self.users_url(), id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| format!("identity delete request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("identity delete rejected: {}", response.status()));
        }
        Ok(())
    }
}

/// MockIdentityService
///
/// In-memory stand-in used by tests and local tooling: hands out fresh ids
/// and never fails unless constructed with `failing()`.
pub struct MockIdentityService {
    fail: bool,
}

impl MockIdentityService {
    pub fn new() -> Self {
        Self { fail: false }
    }

    /// A mock whose every call errors, for provider-outage paths.
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl Default for MockIdentityService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityService for MockIdentityService {
    async fn create_user(&self, _req: &ProvisionUserRequest) -> Result<String, String> {
        if self.fail {
            return Err("mock identity failure".to_string());
        }
        Ok(format!("user_{}", Uuid::new_v4().simple()))
    }

    async fn update_user(&self, _id: &str, _req: &ProvisionUserRequest) -> Result<(), String> {
        if self.fail {
            return Err("mock identity failure".to_string());
        }
        Ok(())
    }

    async fn delete_user(&self, _id: &str) -> Result<(), String> {
        if self.fail {
            return Err("mock identity failure".to_string());
        }
        Ok(())
    }
}
