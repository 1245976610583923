use std::borrow::Cow;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use bigdecimal::{BigDecimal, Zero};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

/// JSON body that has passed `validator` checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string that has passed `validator` checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some(Cow::Borrowed("must not be blank"));
        return Err(error);
    }
    Ok(())
}

/// Integer digits left in a `NUMERIC(19, 2)` column.
const AMOUNT_INTEGER_DIGITS: u32 = 17;

/// Rejects amounts that are not positive or too wide once stored in a
/// `NUMERIC(19, 2)` column, which rounds to two decimal places.
pub fn positive_amount(value: &BigDecimal) -> Result<(), ValidationError> {
    let stored = value.round(2);
    if stored <= BigDecimal::zero() {
        return Err(amount_error("positive", "Amount must be greater than zero"));
    }

    if stored >= BigDecimal::from(10_i64.pow(AMOUNT_INTEGER_DIGITS)) {
        return Err(amount_error(
            "max_digits",
            "Amount must have at most 17 integer digits",
        ));
    }
    Ok(())
}

fn amount_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;
    use std::str::FromStr;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(custom(function = "not_blank", message = "Name is required"))]
        name: String,
        #[validate(custom(function = "positive_amount", message = "Amount must be positive"))]
        amount: BigDecimal,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct TestQuery {
        #[validate(range(min = 1, message = "Page must be at least 1"))]
        page: u32,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_json() {
        let request = json_request(r#"{"name":"Wallet","amount":"10.50"}"#);
        let ValidatedJson(body) = ValidatedJson::<TestBody>::from_request(request, &())
            .await
            .unwrap();

        assert_eq!(body.name, "Wallet");
        assert_eq!(body.amount, BigDecimal::from_str("10.50").unwrap());
    }

    #[tokio::test]
    async fn test_invalid_json_fields_are_collected() {
        let request = json_request(r#"{"name":"   ","amount":0}"#);
        let error = ValidatedJson::<TestBody>::from_request(request, &())
            .await
            .unwrap_err();

        match error {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "amount");
                assert_eq!(errors[0].message, "Amount must be positive");
                assert_eq!(errors[1].field, "name");
                assert_eq!(errors[1].message, "Name is required");
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = json_request(r#"{"name":"Wallet""#);
        let error = ValidatedJson::<TestBody>::from_request(request, &())
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_query_validation() {
        let request = Request::builder()
            .uri("/test?page=0")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let error = ValidatedQuery::<TestQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::ValidationErrors { .. }));
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t").is_err());
    }

    #[test]
    fn test_positive_amount() {
        assert!(positive_amount(&BigDecimal::from(1)).is_ok());
        assert!(positive_amount(&BigDecimal::from(0)).is_err());
        assert!(positive_amount(&BigDecimal::from(-5)).is_err());
    }

    #[test]
    fn test_amount_must_fit_money_column() {
        let amount = |s: &str| BigDecimal::from_str(s).unwrap();

        assert!(positive_amount(&amount("99999999999999999.99")).is_ok());
        assert!(positive_amount(&amount("0.01")).is_ok());
        assert_eq!(positive_amount(&amount("0.001")).unwrap_err().code, "positive");

        for too_wide in ["100000000000000000", "99999999999999999.999", "1e23"] {
            let error = positive_amount(&amount(too_wide)).unwrap_err();
            assert_eq!(error.code, "max_digits", "{too_wide}");
        }
    }
}
