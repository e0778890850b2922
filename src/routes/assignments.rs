use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, GradeSubmissionRequest,
    SubmitAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AssignmentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(query.into_inner(), &req)
        .await
}

pub async fn get_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(assignment_id.0, &req).await
}

pub async fn create_assignment(
    req: HttpRequest,
    assignment_data: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(assignment_data.into_inner(), &req)
        .await
}

pub async fn update_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    update_data: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(assignment_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(assignment_id.0, &req)
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_submissions(assignment_id.0, &req)
        .await
}

pub async fn submit_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    submission: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .submit_assignment(assignment_id.0, submission.into_inner(), &req)
        .await
}

pub async fn get_my_submission(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_my_submission(assignment_id.0, &req)
        .await
}

pub async fn grade_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
    grade_data: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .grade_submission(submission_id.0, grade_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列表按角色过滤（业务层处理）
                    .route(web::get().to(list_assignments))
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            // 批改需在 /{id} 之前注册
            .service(
                web::resource("/submissions/{id}/grade")
                    .route(web::post().to(grade_submission))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_assignment))
                    .route(
                        web::put()
                            .to(update_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/submissions")
                    .route(web::get().to(list_submissions))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/submit")
                    .route(web::post().to(submit_assignment))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/{id}/my-submission")
                    .route(web::get().to(get_my_submission))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            ),
    );
}
