/*!
 * 基于角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用，用户具有任一所需角色即可通过。
 *
 * ```rust,ignore
 * web::scope("/api/v1/users")
 *     .wrap(RequireRole::new_any(UserRole::admin_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<UserRole>,
}

impl RequireRole {
    /// 需要特定角色
    pub fn new(role: &UserRole) -> Self {
        Self {
            required_roles: vec![*role],
        }
    }

    /// 需要任一角色
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| **r).collect(),
        }
    }

    fn allows(&self, role: UserRole) -> bool {
        self.required_roles.contains(&role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            policy: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    policy: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            let user = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role));

            match user {
                Some((_, role)) if policy.allows(role) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some((user_id, role)) => {
                    info!(
                        "Access denied for user {} (role: {}). Required roles: {:?}",
                        user_id, role, policy.required_roles
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied.",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!(
                        "Role check failed: no user in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_role_policy() {
        let teachers = RequireRole::new_any(UserRole::teacher_roles());
        assert!(teachers.allows(UserRole::Teacher));
        assert!(teachers.allows(UserRole::Admin));
        assert!(!teachers.allows(UserRole::Student));

        let admin = RequireRole::new(&UserRole::Admin);
        assert!(admin.allows(UserRole::Admin));
        assert!(!admin.allows(UserRole::Teacher));
    }
}
