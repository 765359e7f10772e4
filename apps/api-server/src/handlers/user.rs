//! User context endpoint - echoes the asserted identity back to the client.

use actix_web::HttpResponse;

use croft_shared::dto::UserContextResponse;

use crate::middleware::identity::Identity;

/// POST /api/user/context
///
/// Nothing is persisted; the frontend uses the echo to confirm which
/// identity headers it is sending.
pub async fn context(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(UserContextResponse {
        username: identity.username,
        user_image: identity.avatar,
    })
}
