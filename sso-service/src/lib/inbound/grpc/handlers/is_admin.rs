use tonic::Status;

use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::IsAdminRequest;
use crate::proto::IsAdminResponse;

const EMPTY_USER_ID: i64 = 0;

pub async fn is_admin<S: AuthServicePort>(
    service: &S,
    request: IsAdminRequest,
) -> Result<IsAdminResponse, Status> {
    if request.user_id == EMPTY_USER_ID {
        return Err(Status::invalid_argument("user_id is required"));
    }

    let is_admin = service.is_admin(UserId(request.user_id)).await?;

    Ok(IsAdminResponse { is_admin })
}
