use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const USER_TAG: &str = "User";
pub const AUTH_TAG: &str = "Auth";
pub const ACCOUNT_TAG: &str = "Accounts";
pub const CATEGORY_TAG: &str = "Categories";
pub const CREDIT_CARD_TAG: &str = "Credit Cards";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Finance Tracker",
        description = "Personal finance API: accounts, categories and credit cards",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
        )
    ),
    tags(
        (name = USER_TAG, description = "Registration and the caller's own user record"),
        (name = AUTH_TAG, description = "Authentication endpoints"),
        (name = ACCOUNT_TAG, description = "Bank accounts owned by the caller"),
        (name = CATEGORY_TAG, description = "Income and expense categories"),
        (name = CREDIT_CARD_TAG, description = "Credit cards attached to the caller's accounts"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by POST /api/auth"))
                        .build(),
                ),
            )
        }
    }
}
