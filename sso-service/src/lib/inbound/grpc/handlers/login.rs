use tonic::Status;

use crate::domain::auth::models::AppId;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;

const EMPTY_APP_ID: i32 = 0;

pub async fn login<S: AuthServicePort>(
    service: &S,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    validate(&request)?;

    let token = service
        .login(&request.email, &request.password, AppId(request.app_id))
        .await?;

    Ok(LoginResponse { token })
}

fn validate(request: &LoginRequest) -> Result<(), Status> {
    if request.email.is_empty() {
        return Err(Status::invalid_argument("email is required"));
    }
    if request.password.is_empty() {
        return Err(Status::invalid_argument("password is required"));
    }
    if request.app_id == EMPTY_APP_ID {
        return Err(Status::invalid_argument("app_id is required"));
    }
    Ok(())
}
