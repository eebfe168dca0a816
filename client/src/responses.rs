use crate::Result;

use log::trace;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// A round trip that did not produce a decodable success response.
#[derive(Debug, thiserror::Error)]
#[error("HTTP {status_code}: {cause}")]
pub struct ResponseError {
    status_code: u16,
    body: String,
    #[source]
    cause: ResponseErrorCause,
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseErrorCause {
    #[error("got HTTP {0}")]
    Status(StatusCode),
    #[error("error decoding response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("error reading response: {0}")]
    Read(#[source] reqwest::Error),
}

impl ResponseError {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Raw response body as text. Empty when the body was empty or unreadable.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn cause(&self) -> &ResponseErrorCause {
        &self.cause
    }

    pub fn is_status(&self) -> bool {
        matches!(self.cause, ResponseErrorCause::Status(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self.cause, ResponseErrorCause::Decode(_))
    }
}

/// Read the whole body and turn it into `T` or a [`ResponseError`].
///
/// A status of 400 or above fails without looking at the body. The response
/// is consumed here, which releases the connection on every path.
pub(crate) fn parse_response<T>(response: reqwest::blocking::Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let (body, read_error) = match response.bytes() {
        Ok(bytes) => (bytes.to_vec(), None),
        Err(err) => (Vec::new(), Some(err)),
    };
    trace!("response {} with {} byte body", status, body.len());

    let cause = if status.as_u16() >= 400 {
        ResponseErrorCause::Status(status)
    } else if let Some(err) = read_error {
        ResponseErrorCause::Read(err)
    } else {
        match serde_json::from_slice::<T>(&body) {
            Ok(value) => return Ok(value),
            Err(err) => ResponseErrorCause::Decode(err),
        }
    };

    Err(ResponseError {
        status_code: status.as_u16(),
        body: String::from_utf8_lossy(&body).into_owned(),
        cause,
    }
    .into())
}
