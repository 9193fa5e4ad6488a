use serde::{Deserialize, Serialize};

/// Claims carried by the identity provider's session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
    pub iat: usize,
}

/// Verified session, available via the Axum extractor. Not yet resolved to a
/// user row.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
}
