//! Role provider trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::RoleSnapshot;
use crate::error::MenuError;

/// Looks up a user's role and stored capability map.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleProvider: Send + Sync {
    async fn fetch_role(&self, user_id: &Uuid) -> Result<RoleSnapshot, MenuError>;
}
