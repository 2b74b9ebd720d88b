//! Wire envelopes returned by the remote data service.
//!
//! Bodies are decoded twice: first into [`StatusDto`] to detect business
//! failures regardless of payload shape, then into the typed payload.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::ports::{DEFAULT_ERROR_MESSAGE, RemoteError};
use crate::domain::{Actor, Amount};

/// Failure markers shared by every response.
#[derive(Debug, Default, Deserialize)]
pub(super) struct StatusDto {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl StatusDto {
    /// A response fails when `success` is false or `error` carries text.
    pub(super) fn is_failure(&self) -> bool {
        self.success == Some(false) || non_blank(self.error.as_deref()).is_some()
    }

    /// Human-readable message: `error`, then `message`, then `fallback`.
    pub(super) fn message_or(&self, fallback: &str) -> String {
        non_blank(self.error.as_deref())
            .or_else(|| non_blank(self.message.as_deref()))
            .unwrap_or(fallback)
            .to_owned()
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

#[derive(Debug, Deserialize)]
struct DataDto<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginDto {
    pub(super) token: String,
    pub(super) user: Actor,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProfileDto {
    pub(super) user: Actor,
}

#[derive(Debug, Default, Deserialize)]
struct TotalDto {
    #[serde(default)]
    total: Option<Amount>,
}

fn decode_error(error: &serde_json::Error) -> RemoteError {
    RemoteError::decode(format!("invalid response payload: {error}"))
}

/// Reject business failures, then decode the whole body as `T`.
pub(super) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RemoteError> {
    let status: StatusDto = serde_json::from_slice(body).map_err(|error| decode_error(&error))?;
    if status.is_failure() {
        return Err(RemoteError::rejected(status.message_or(DEFAULT_ERROR_MESSAGE)));
    }
    serde_json::from_slice(body).map_err(|error| decode_error(&error))
}

/// Reject business failures, then decode the `data` field as `T`.
pub(super) fn decode_data<T: DeserializeOwned>(body: &[u8]) -> Result<T, RemoteError> {
    decode_body::<DataDto<T>>(body)?
        .data
        .ok_or_else(|| RemoteError::decode("response carried no data"))
}

/// Decode a `{data: {total}}` metric; a missing total reads as zero.
pub(super) fn decode_total(body: &[u8]) -> Result<Amount, RemoteError> {
    let envelope = decode_body::<DataDto<TotalDto>>(body)?;
    Ok(envelope
        .data
        .and_then(|data| data.total)
        .unwrap_or(Amount::ZERO))
}

/// Message for a non-2xx body: the body's own text when decodable.
pub(super) fn status_message(code: u16, body: &[u8]) -> String {
    let fallback = format!("request failed with status {code}");
    serde_json::from_slice::<StatusDto>(body)
        .map(|status| status.message_or(&fallback))
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resources::{Expense, Shop};
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"success":false,"error":"Invalid credentials"}"#, "Invalid credentials")]
    #[case(r#"{"success":false,"message":"Shop closed"}"#, "Shop closed")]
    #[case(r#"{"error":"Quota exceeded","data":[]}"#, "Quota exceeded")]
    #[case(r#"{"success":false}"#, DEFAULT_ERROR_MESSAGE)]
    #[case(r#"{"success":false,"error":"  ","message":"Fallback text"}"#, "Fallback text")]
    fn business_failures_become_rejections(#[case] body: &str, #[case] expected: &str) {
        let error = decode_data::<Vec<Shop>>(body.as_bytes()).expect_err("must fail");
        assert_eq!(error, RemoteError::rejected(expected));
    }

    #[test]
    fn data_decodes_when_success_is_absent() {
        let shops: Vec<Shop> =
            decode_data(br#"{"data":[{"id":1,"name":"North","address":"1 High St"}]}"#)
                .expect("shops");
        assert_eq!(shops.len(), 1);
    }

    #[test]
    fn missing_data_is_a_decode_error() {
        let error = decode_data::<Shop>(br#"{"success":true}"#).expect_err("no data");
        assert!(matches!(error, RemoteError::Decode { .. }));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let error = decode_data::<Shop>(b"<html>").expect_err("not json");
        assert!(matches!(error, RemoteError::Decode { .. }));
    }

    #[rstest]
    #[case(r#"{"success":true,"data":{"total":250}}"#, "250")]
    #[case(r#"{"success":true,"data":{"total":150.5}}"#, "150.5")]
    #[case(r#"{"success":true,"data":{"total":"99.95"}}"#, "99.95")]
    #[case(r#"{"success":true,"data":{"total":null}}"#, "0")]
    #[case(r#"{"success":true,"data":{}}"#, "0")]
    #[case(r#"{"success":true}"#, "0")]
    fn totals_decode_exactly_and_default_to_zero(#[case] body: &str, #[case] expected: &str) {
        let expected: Amount = expected.parse().expect("decimal literal");
        assert_eq!(decode_total(body.as_bytes()).expect("total"), expected);
    }

    #[test]
    fn expenses_keep_fractional_amounts() {
        let expenses: Vec<Expense> = decode_data(
            br#"{"data":[{"id":1,"shop_id":2,"user_id":3,"amount":12.75,"message":"x"}]}"#,
        )
        .expect("expenses");
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, "12.75".parse::<Amount>().expect("decimal literal"));
    }

    #[test]
    fn login_payload_carries_token_and_user() {
        let login: LoginDto = decode_body(
            br#"{"success":true,"token":"abc","user":{"id":1,"name":"Ana","email":"a@x.io","role":"admin"}}"#,
        )
        .expect("login");
        assert_eq!(login.token, "abc");
        assert_eq!(login.user.name(), "Ana");
    }

    #[rstest]
    #[case(br#"{"error":"Token expired"}"#.as_slice(), "Token expired")]
    #[case(b"Bad Gateway".as_slice(), "request failed with status 502")]
    #[case(b"".as_slice(), "request failed with status 502")]
    fn status_messages_prefer_the_body(#[case] body: &[u8], #[case] expected: &str) {
        assert_eq!(status_message(502, body), expected);
    }
}
