//! Response decoding and status mapping.

use std::collections::BTreeMap;

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult};

/// Body shape of a 422 from the backend validator.
#[derive(Debug, Default, Deserialize)]
struct ValidationBody {
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

/// Decode a JSON body after the status has been vetted.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = check_status(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// Vet the status and drop the body. For deletes and other endpoints that
/// answer with nothing.
pub(crate) async fn expect_success(response: Response) -> ClientResult<()> {
    check_status(response).await.map(|_| ())
}

/// Map non-success statuses to their error variants, consuming the body for
/// whatever detail it carries.
pub(crate) async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(match status {
        StatusCode::UNAUTHORIZED => ClientError::SessionExpired,
        StatusCode::FORBIDDEN => ClientError::Forbidden,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::UNPROCESSABLE_ENTITY => {
            let body: ValidationBody = response.json().await.unwrap_or_default();
            ClientError::Validation { errors: body.errors }
        }
        s if s.is_server_error() => ClientError::Server {
            status: s.as_u16(),
        },
        s => {
            let message = response.text().await.unwrap_or_default();
            ClientError::Request {
                status: s.as_u16(),
                message,
            }
        }
    })
}

/// The connection never came up, so nothing reached the server and
/// repeating the request cannot double-apply anything. Only idempotent
/// reads use this.
pub(crate) fn retryable(error: &reqwest::Error) -> bool {
    error.is_connect()
}

pub(crate) fn network(error: reqwest::Error) -> ClientError {
    ClientError::Network(error.to_string())
}
