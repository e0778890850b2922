use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::InquiryService;
use crate::models::inquiries::requests::CreateInquiryRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response};
use crate::utils::validate::{non_empty, validate_email};

const MAX_MESSAGE_LEN: usize = 5000;

/// 清理并校验咨询表单
pub(crate) fn normalize_inquiry(
    inquiry: CreateInquiryRequest,
) -> Result<CreateInquiryRequest, &'static str> {
    let name = non_empty(Some(inquiry.name.as_str())).ok_or("Name is required")?;
    let email = inquiry.email.trim().to_lowercase();
    validate_email(&email)?;
    let message = non_empty(Some(inquiry.message.as_str())).ok_or("Message is required")?;
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err("Message is too long");
    }

    Ok(CreateInquiryRequest {
        name,
        email,
        phone: non_empty(inquiry.phone.as_deref()),
        message,
        course_id: inquiry.course_id,
    })
}

pub async fn create_inquiry(
    service: &InquiryService,
    inquiry: CreateInquiryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let inquiry = match normalize_inquiry(inquiry) {
        Ok(inquiry) => inquiry,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request)?;

    // 关联课程不存在时忽略
    let inquiry = match inquiry.course_id {
        Some(course_id) => match storage.get_course_by_id(course_id).await {
            Ok(Some(_)) => inquiry,
            Ok(None) => CreateInquiryRequest {
                course_id: None,
                ..inquiry
            },
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        },
        None => inquiry,
    };

    match storage.create_inquiry(inquiry).await {
        Ok(inquiry) => {
            info!("New inquiry {} from {}", inquiry.id, inquiry.email);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                inquiry,
                "Thank you, we will get back to you soon",
            )))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inquiry(name: &str, email: &str, message: &str) -> CreateInquiryRequest {
        CreateInquiryRequest {
            name: name.to_string(),
            email: email.to_string(),
            phone: Some("  ".to_string()),
            message: message.to_string(),
            course_id: None,
        }
    }

    #[test]
    fn test_normalize_inquiry() {
        let ok = normalize_inquiry(inquiry(" Ann ", "Ann@Example.com ", "Hi")).unwrap();
        assert_eq!(ok.name, "Ann");
        assert_eq!(ok.email, "ann@example.com");
        assert_eq!(ok.phone, None);

        assert!(normalize_inquiry(inquiry("", "a@b.co", "Hi")).is_err());
        assert!(normalize_inquiry(inquiry("Ann", "not-an-email", "Hi")).is_err());
        assert!(normalize_inquiry(inquiry("Ann", "a@b.co", "  ")).is_err());
        assert!(normalize_inquiry(inquiry("Ann", "a@b.co", &"x".repeat(5001))).is_err());
    }
}
