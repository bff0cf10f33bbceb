//! 授权决策点
//!
//! 每次操作开始时从存储读取操作者当前的角色，然后交给 `PolicyEngine` 求值，
//! 并把拒绝原因翻译为 `AppError`。请求级检查通过后得到 `Admission`，
//! 路径、查询参数和请求体都在拿到 `Admission` 之后才解析。

use std::sync::Arc;

use atrium_errors::{AppError, AppResult};
use metrics::counter;
use tracing::debug;

use crate::domain::identity::{Actor, IdentityStore};
use crate::domain::policy::{AuthContext, Denial, OperationKind, Owned, PolicyEngine};

const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

/// 已通过请求级检查的授权上下文
///
/// 只能由 `Authorizer::admit` 构造，并绑定到一个操作类别。
#[derive(Debug, Clone)]
pub struct Admission {
    op: OperationKind,
    ctx: AuthContext,
}

impl Admission {
    pub fn op(&self) -> OperationKind {
        self.op
    }

    /// 取出 `op` 的授权上下文；准入针对的是其他操作时返回内部错误
    pub fn context_for(&self, op: OperationKind) -> AppResult<&AuthContext> {
        if self.op != op {
            return Err(AppError::internal(format!(
                "Admission for '{}' used for '{}'",
                self.op, op
            )));
        }
        Ok(&self.ctx)
    }
}

pub struct Authorizer {
    identity: Arc<dyn IdentityStore>,
}

impl Authorizer {
    pub fn new(identity: Arc<dyn IdentityStore>) -> Self {
        Self { identity }
    }

    /// 解析本次请求的授权上下文
    ///
    /// 令牌指向的用户不存在或已停用时按匿名处理。
    pub async fn resolve(&self, actor: &Actor) -> AppResult<AuthContext> {
        let Some(principal) = actor.principal() else {
            return Ok(AuthContext::anonymous());
        };

        let Some(user) = self.identity.find_user_by_id(&principal.user_id).await? else {
            debug!(user_id = %principal.user_id, "Token subject no longer exists");
            return Ok(AuthContext::anonymous());
        };
        if !user.is_active {
            debug!(user_id = %user.id, "Token subject is inactive");
            return Ok(AuthContext::anonymous());
        }

        let roles = self.identity.roles_of(&user.id).await?;
        Ok(AuthContext::authenticated(user.principal(), roles))
    }

    /// 解析上下文并执行 `op` 的请求级检查
    pub async fn admit(&self, actor: &Actor, op: OperationKind) -> AppResult<Admission> {
        let ctx = self.resolve(actor).await?;
        self.require(op, &ctx)?;
        Ok(Admission { op, ctx })
    }

    /// 请求级检查
    pub fn require(&self, op: OperationKind, ctx: &AuthContext) -> AppResult<()> {
        let decision = PolicyEngine::authorize_request(op, ctx);
        record(op, ctx, decision);
        decision.map_err(to_app_error)
    }

    /// 对象级检查
    pub fn require_object<O: Owned + ?Sized>(
        &self,
        op: OperationKind,
        ctx: &AuthContext,
        object: &O,
    ) -> AppResult<()> {
        let decision = PolicyEngine::authorize_object(op, ctx, object);
        record(op, ctx, decision);
        decision.map_err(to_app_error)
    }
}

fn record(op: OperationKind, ctx: &AuthContext, decision: Result<(), Denial>) {
    let outcome = match decision {
        Ok(()) => "allowed",
        Err(denial) => denial.as_str(),
    };

    debug!(
        operation = %op,
        user_id = ?ctx.user_id().map(ToString::to_string),
        outcome,
        "Authorization decision"
    );
    counter!(
        "authorization_decisions_total",
        "operation" => op.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

fn to_app_error(denial: Denial) -> AppError {
    match denial {
        Denial::Unauthenticated => AppError::unauthenticated(NOT_AUTHENTICATED),
        Denial::MissingRole | Denial::NotOwner => AppError::forbidden(PERMISSION_DENIED),
    }
}
