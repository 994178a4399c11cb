//! Found-pet notification endpoint.
//!
//! ```text
//! POST /api/send-email {"to":"owner@example.com","petName":"Luna","finderContact":"600 111 222"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EmailAddress, FoundPetNotification};
use crate::inbound::http::ApiResult;
use crate::inbound::http::scan::LocationPayload;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, require_text};

const TO_FIELD: FieldName = FieldName::new("to");
const PET_NAME_FIELD: FieldName = FieldName::new("petName");
const FINDER_CONTACT_FIELD: FieldName = FieldName::new("finderContact");

/// Notification request.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SendEmailRequest {
    /// Recipient address.
    pub to: Option<String>,
    /// Subject; derived from the pet name when absent.
    pub subject: Option<String>,
    /// Pet name.
    pub pet_name: Option<String>,
    /// How the owner can reach the finder.
    pub finder_contact: Option<String>,
    /// Finder message.
    pub message: Option<String>,
    /// Where the pet was seen.
    pub location: Option<LocationPayload>,
}

impl SendEmailRequest {
    fn into_notification(self) -> ApiResult<FoundPetNotification> {
        let raw_to = require_text(self.to.as_deref(), TO_FIELD)?;
        let pet_name = require_text(self.pet_name.as_deref(), PET_NAME_FIELD)?;
        let finder_contact = require_text(self.finder_contact.as_deref(), FINDER_CONTACT_FIELD)?;
        let to = EmailAddress::new(&raw_to)
            .map_err(|err| invalid_value_error(TO_FIELD, &raw_to, err))?;
        let location = self.location.map(LocationPayload::into_geo).transpose()?;
        Ok(FoundPetNotification {
            to,
            subject: self.subject,
            pet_name,
            finder_contact,
            message: self.message,
            location,
        })
    }
}

/// Delivery confirmation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    /// Always `true`; failures answer with an error body.
    pub success: bool,
    /// Provider message id.
    pub message_id: String,
}

/// Email an owner that their pet was found.
#[utoipa::path(
    post,
    path = "/api/send-email",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email sent", body = SendEmailResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 403, description = "Provider sandbox rejected the recipient",
            body = ErrorSchema),
        (status = 500, description = "Email not configured or provider failure",
            body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "sendFoundPetEmail",
    security([])
)]
#[post("/api/send-email")]
pub async fn send_email(
    state: web::Data<HttpState>,
    payload: web::Json<SendEmailRequest>,
) -> ApiResult<web::Json<SendEmailResponse>> {
    let notification = payload.into_inner().into_notification()?;
    let message_id = state.notifications.dispatch(notification).await?;
    Ok(web::Json(SendEmailResponse {
        success: true,
        message_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error;
    use crate::domain::ports::MockNotificationDispatch;
    use crate::inbound::http::test_utils::{handler_app, mock_ports};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    #[actix_web::test]
    async fn dispatches_the_notification() {
        let mut notifications = MockNotificationDispatch::new();
        notifications
            .expect_dispatch()
            .withf(|n| {
                n.to.as_ref() == "owner@example.com"
                    && n.pet_name == "Luna"
                    && n.location
                        .as_ref()
                        .is_some_and(|l| l.address.as_deref() == Some("Calle Mayor 1"))
            })
            .times(1)
            .return_once(|_| Ok("msg-42".into()));
        let mut ports = mock_ports();
        ports.notifications = Arc::new(notifications);
        let app = handler_app!(ports, send_email);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/send-email")
                .set_json(json!({
                    "to": "owner@example.com",
                    "petName": "Luna",
                    "finderContact": "600 111 222",
                    "location": {"latitude": 40.4168, "longitude": -3.7038, "address": "Calle Mayor 1"}
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"success": true, "messageId": "msg-42"}));
    }

    #[rstest]
    #[case(json!({"to": "owner@example.com", "finderContact": "Luis"}), "petName", "missing_field")]
    #[case(json!({"to": "owner@example.com", "petName": "Luna"}), "finderContact", "missing_field")]
    #[case(json!({"petName": "Luna", "finderContact": "Luis"}), "to", "missing_field")]
    #[case(json!({"to": "nope", "petName": "Luna", "finderContact": "Luis"}), "to", "invalid_value")]
    #[actix_web::test]
    async fn incomplete_requests_send_nothing(
        #[case] body: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mut notifications = MockNotificationDispatch::new();
        notifications.expect_dispatch().never();
        let mut ports = mock_ports();
        ports.notifications = Arc::new(notifications);
        let app = handler_app!(ports, send_email);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/send-email")
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: Value = test::read_body_json(res).await;
        assert_eq!(err["details"]["field"], field);
        assert_eq!(err["details"]["code"], code);
    }

    #[actix_web::test]
    async fn unconfigured_email_keeps_its_public_code() {
        let mut notifications = MockNotificationDispatch::new();
        notifications.expect_dispatch().return_once(|_| {
            Err(Error::internal("email service not configured")
                .with_details(json!({"code": "email_not_configured"})))
        });
        let mut ports = mock_ports();
        ports.notifications = Arc::new(notifications);
        let app = handler_app!(ports, send_email);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/send-email")
                .set_json(json!({"to": "owner@example.com", "petName": "Luna", "finderContact": "Luis"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err: Value = test::read_body_json(res).await;
        assert_eq!(err["details"]["code"], "email_not_configured");
    }
}
