use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    AppState,
    db::models::{
        api::{ApiResponse, ResponseMeta},
        user::{AccessToken, CreateUserRequest, LoginForm, TokenPair, UserInfo},
    },
    error::AppResult,
    middleware::{RequestContext, auth::RefreshUser},
    routes::with_conn,
    services::UsersService,
    validation::{FormData, PathParams, ValidatedJson},
};

const TOKEN_TYPE: &str = "bearer";

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserInfo>>)> {
    let bcrypt_cost = state.config.bcrypt_cost;
    let user = with_conn(&state, move |conn| {
        UsersService::create(conn, &payload, bcrypt_cost)
    })
    .await?;

    tracing::info!(trace_id = %ctx.trace_id, user_id = user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            UserInfo::from(user),
            "User created successfully",
            ResponseMeta::for_request(&ctx),
        )),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    FormData(form): FormData<LoginForm>,
) -> AppResult<Json<ApiResponse<TokenPair>>> {
    let user = with_conn(&state, move |conn| {
        UsersService::authenticate(conn, &form.username, &form.password)
    })
    .await?;

    let auth = &state.auth_service;
    let tokens = TokenPair {
        access_token: auth.generate_access_token(&user.username, user.id)?,
        refresh_token: auth.generate_refresh_token(&user.username, user.id)?,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: auth.access_expires_in(),
    };

    tracing::info!(trace_id = %ctx.trace_id, user_id = user.id, "User logged in");

    Ok(Json(ApiResponse::success_with_meta(
        tokens,
        "Login successful",
        ResponseMeta::for_request(&ctx),
    )))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    user: RefreshUser,
) -> AppResult<Json<ApiResponse<AccessToken>>> {
    let auth = &state.auth_service;
    let token = AccessToken {
        access_token: auth.generate_access_token(&user.username, user.id)?,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: auth.access_expires_in(),
    };

    Ok(Json(ApiResponse::success_with_meta(
        token,
        "Token refreshed successfully",
        ResponseMeta::for_request(&ctx),
    )))
}

#[derive(Serialize)]
pub struct DeletedUser {
    pub id: i32,
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    PathParams(user_id): PathParams<i32>,
) -> AppResult<Json<ApiResponse<DeletedUser>>> {
    with_conn(&state, move |conn| UsersService::delete(conn, user_id)).await?;

    tracing::info!(trace_id = %ctx.trace_id, user_id, "User deleted");

    Ok(Json(ApiResponse::success_with_meta(
        DeletedUser { id: user_id },
        "User deleted successfully",
        ResponseMeta::for_request(&ctx),
    )))
}
