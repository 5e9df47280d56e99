use actix_web::{HttpRequest, HttpResponse, Scope, web};
use tracing::info;

use crate::application::user_service::UserService;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::CreateUserRequest;
use crate::presentation::middleware::request_id;

pub fn scope<R: UserRepository + 'static>() -> Scope {
    web::scope("/users").service(
        web::resource("")
            .route(web::post().to(create_user::<R>))
            .route(web::get().to(list_users::<R>)),
    )
}

async fn create_user<R: UserRepository + 'static>(
    req: HttpRequest,
    service: web::Data<UserService<R>>,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, DomainError> {
    let user = service.create_user(payload.into_inner().username).await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.id,
        "user created"
    );

    Ok(HttpResponse::Ok().json(user))
}

async fn list_users<R: UserRepository + 'static>(
    req: HttpRequest,
    service: web::Data<UserService<R>>,
) -> Result<HttpResponse, DomainError> {
    let users = service.list_users().await?;

    info!(
        request_id = %request_id(&req),
        total = users.len(),
        "users retrieved"
    );

    Ok(HttpResponse::Ok().json(users))
}
