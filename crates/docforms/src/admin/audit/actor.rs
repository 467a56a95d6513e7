use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};

use super::domain::Actor;
use crate::admin::users::UserId;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl Actor {
    /// Identity headers are set by the authenticating proxy in front of this service.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            user_id: header_value(headers, ACTOR_ID_HEADER).map(UserId),
            role: header_value(headers, ACTOR_ROLE_HEADER).and_then(|role| role.parse().ok()),
            ip_address: header_value(headers, FORWARDED_FOR_HEADER)
                .and_then(|chain| chain.split(',').next().map(|ip| ip.trim().to_string())),
            user_agent: header_value(headers, header::USER_AGENT.as_str()),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Actor::from_headers(&parts.headers))
    }
}
