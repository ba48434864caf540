pub mod auth;
pub mod book;

use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query},
    http::{Request, request::Parts},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// 验证的 JSON 提取器
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S, axum::body::Body> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<axum::body::Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e)))?;

        value.validate().map_err(|errors| {
            let mut details: Vec<String> = errors
                .field_errors()
                .iter()
                .flat_map(|(field, field_errors)| {
                    field_errors.iter().map(move |error| {
                        let message = error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| error.code.to_string());
                        format!("{}: {}", field, message)
                    })
                })
                .collect();
            // field_errors() is a HashMap; keep the message stable
            details.sort();
            AppError::validation(details.join("; "))
        })?;

        Ok(ValidatedJson(value))
    }
}

/// 查询参数提取器，解析失败时返回 `AppError`
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(QueryParams(value))
    }
}

/// 路径参数提取器
pub struct PathParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(PathParams(value))
    }
}

/// 表单提取器
pub struct FormData<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S, axum::body::Body> for FormData<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<axum::body::Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await?;
        Ok(FormData(value))
    }
}

/// 常用验证规则
pub mod rules {
    use validator::ValidationError;

    /// 验证用户名格式
    pub fn validate_username_format(username: &str) -> Result<(), ValidationError> {
        // 只允许字母、数字、下划线和连字符
        if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(ValidationError::new("invalid_username_format"));
        }

        // 不能以数字开头
        if username.chars().next().is_some_and(|c| c.is_numeric()) {
            return Err(ValidationError::new("username_starts_with_number"));
        }

        Ok(())
    }

}
