use tonic::Status;

use crate::domain::auth::ports::AuthServicePort;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub async fn register<S: AuthServicePort>(
    service: &S,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    validate(&request)?;

    let user_id = service
        .register_new_user(&request.email, &request.password)
        .await?;

    Ok(RegisterResponse { user_id: user_id.0 })
}

fn validate(request: &RegisterRequest) -> Result<(), Status> {
    if request.email.is_empty() {
        return Err(Status::invalid_argument("email is required"));
    }
    if request.password.is_empty() {
        return Err(Status::invalid_argument("password is required"));
    }
    Ok(())
}
