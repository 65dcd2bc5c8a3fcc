use crate::{
    accounts::AccountService,
    auth::{LoginRequest, LoginResponse, SignupRequest},
    error::AppError,
    routes::MessageResponse,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new account
///
/// Returns only a confirmation message; the client logs in separately to
/// obtain a token.
#[post("/signup")]
pub async fn signup(
    accounts: web::Data<AccountService>,
    payload: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    accounts.signup(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("User created successfully")))
}

/// Log in
///
/// Exchanges email and password for an access token.
#[post("/login")]
pub async fn login(
    accounts: web::Data<AccountService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let token = accounts.login(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "User logged in successfully".to_string(),
        token,
    }))
}
