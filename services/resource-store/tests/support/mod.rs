#![allow(dead_code)]

use std::sync::Arc;

use atrium_auth_core::{HashedPassword, TokenService};
use atrium_config::PaginationConfig;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use resource_store::domain::identity::{IdentityStore, RoleName, User};
use resource_store::infrastructure::InMemoryStore;
use resource_store::startup::build_state;
use resource_store::api::build_router;
use serde_json::Value;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestUser {
    pub user: User,
    pub token: String,
}

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub tokens: Arc<TokenService>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let tokens = Arc::new(TokenService::new(JWT_SECRET, 3600, "atrium", "atrium-api"));
        let state = build_state(
            store.clone(),
            store.clone(),
            tokens.clone(),
            PaginationConfig::default(),
            None,
        );

        Self {
            store,
            tokens,
            router: build_router(state),
        }
    }

    /// 创建用户并授予角色，返回其访问令牌（密码不可用于登录）
    pub async fn user(&self, username: &str, roles: &[&str]) -> TestUser {
        self.user_with_password(username, HashedPassword::from_hash("!"), roles)
            .await
    }

    /// 密码为 `{username}-password`
    pub async fn login_user(&self, username: &str, roles: &[&str]) -> TestUser {
        let password = HashedPassword::from_plain(&format!("{username}-password")).unwrap();
        self.user_with_password(username, password, roles).await
    }

    async fn user_with_password(
        &self,
        username: &str,
        password: HashedPassword,
        roles: &[&str],
    ) -> TestUser {
        let user = User::new(username, password).unwrap();
        self.store.create_user(&user).await.unwrap();
        for role in roles {
            self.store
                .grant_role(&user.id, &RoleName::new(*role).unwrap())
                .await
                .unwrap();
        }
        let token = self
            .tokens
            .generate_access_token(&user.id, &user.username)
            .unwrap();
        TestUser { user, token }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let body = body.map(|body| body.to_string());
        self.send(method, uri, token, body.as_deref()).await
    }

    /// 原样发送请求体，用于构造非法 JSON
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }
}
