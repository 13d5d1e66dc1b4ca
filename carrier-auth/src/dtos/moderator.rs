use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{ModeratorRole, ModeratorStatus, ModeratorUpdate};

/// Partial moderator update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModeratorRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,

    pub role: Option<ModeratorRole>,

    pub status: Option<ModeratorStatus>,
}

impl From<UpdateModeratorRequest> for ModeratorUpdate {
    fn from(req: UpdateModeratorRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            role: req.role,
            status: req.status,
        }
    }
}
