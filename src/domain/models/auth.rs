use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,

    #[serde(rename = "tenantId")]
    pub tenant_id: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
    pub tenant: TenantProfile,
}

#[derive(Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub role: super::user::Role,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantProfile {
    pub id: String,
    pub name: String,
    pub enabled_entities: Vec<String>,
}
