pub use crate::http::Client;
pub use crate::responses::{ResponseError, ResponseErrorCause};

use once_cell::sync::OnceCell;
use serde::{de::DeserializeOwned, Serialize};

pub mod http;
pub mod responses;

/// Media type sent with every JSON payload.
pub const CONTENT_TYPE: &str = "application/json";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("error creating payload: {0}")]
    Payload(#[source] serde_json::Error),
    #[error("error creating request: invalid URL: {0}")]
    InvalidUrl(#[source] url::ParseError),
    #[error("error creating request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("error sending payload: {0}")]
    Send(#[source] reqwest::Error),
    #[error(transparent)]
    Transport(reqwest::Error),
    #[error(transparent)]
    Response(#[from] ResponseError),
}

pub type Result<T> = std::result::Result<T, ClientError>;

static DEFAULT_CLIENT: OnceCell<Client> = OnceCell::new();

/// The shared client behind [`fetch_json`] and [`send_json`], built on first use.
///
/// It has a default transport, no authorization header and compact output.
/// Build a dedicated [`Client`] when any of that needs to change.
pub fn default_client() -> &'static Client {
    DEFAULT_CLIENT.get_or_init(Client::new)
}

/// GET `url` with the default client and decode the JSON response.
pub fn fetch_json<T>(url: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    default_client().fetch_json(url)
}

/// POST `request` as JSON to `url` with the default client and decode the JSON response.
pub fn send_json<Req, T>(url: &str, request: &Req) -> Result<T>
where
    Req: Serialize + ?Sized,
    T: DeserializeOwned,
{
    default_client().send_json(url, request)
}
