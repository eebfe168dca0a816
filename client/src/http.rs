use crate::{responses::parse_response, ClientError, Result, CONTENT_TYPE};

use std::time::Duration;

use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE as HEADER_CONTENT_TYPE};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

/// JSON wrapper around a blocking `reqwest` client.
///
/// The fields may be changed directly after construction. Nothing is
/// validated up front: a bad header value or transport setting only shows up
/// when a call is made.
#[derive(Debug, Clone)]
pub struct Client {
    /// Transport used for every call. Cloning a `reqwest` client shares its
    /// connection pool, so a preconfigured one can be handed in.
    pub http_client: reqwest::blocking::Client,
    /// Sent verbatim as the `Authorization` header on every `send_json` call.
    pub authorization_header: Option<String>,
    /// Indent unit for outgoing payloads. `None` or empty means compact.
    pub indent: Option<String>,
}

impl Client {
    /// Client with a default transport, no authorization and compact output.
    ///
    /// The transport has no request timeout; set one on a dedicated
    /// `reqwest` client and pass it to [`Client::with_http_client`].
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized, the same way
    /// `reqwest::blocking::Client::new` does. Use [`Client::try_new`] to get
    /// the error instead.
    pub fn new() -> Self {
        Self::try_new().expect("failed to initialize HTTP transport")
    }

    pub fn try_new() -> Result<Self> {
        // reqwest's blocking client defaults to a 30s timeout
        let http_client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            http_client,
            authorization_header: None,
            indent: None,
        })
    }

    pub fn with_http_client(mut self, http_client: reqwest::blocking::Client) -> Self {
        self.http_client = http_client;
        self
    }

    pub fn with_authorization_header<S: Into<String>>(mut self, value: S) -> Self {
        self.authorization_header = Some(value.into());
        self
    }

    pub fn with_indent<S: Into<String>>(mut self, indent: S) -> Self {
        self.indent = Some(indent.into());
        self
    }

    /// Fetch `url` with GET and decode the JSON response into `T`.
    ///
    /// Transport failures are returned as [`ClientError::Transport`] without
    /// added context.
    pub fn fetch_json<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .send()
            .map_err(ClientError::Transport)?;

        parse_response(response)
    }

    /// Send `request` as JSON with POST and decode the JSON response into `T`.
    pub fn send_json<Req, T>(&self, url: &str, request: &Req) -> Result<T>
    where
        Req: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.encode_payload(request)?;
        let url = Url::parse(url).map_err(ClientError::InvalidUrl)?;
        let body_len = body.len();

        let mut builder = self
            .http_client
            .post(url)
            .header(HEADER_CONTENT_TYPE, CONTENT_TYPE)
            .body(body);

        if let Some(value) = self.authorization_header.as_deref() {
            if !value.is_empty() {
                builder = builder.header(AUTHORIZATION, value);
            }
        }

        let request = builder.build().map_err(ClientError::Request)?;
        debug!("POST {} ({} bytes)", request.url(), body_len);

        let response = self
            .http_client
            .execute(request)
            .map_err(ClientError::Send)?;

        parse_response(response)
    }

    /// Encode `request` the way [`Client::send_json`] puts it on the wire.
    pub fn encode_payload<Req>(&self, request: &Req) -> Result<Vec<u8>>
    where
        Req: Serialize + ?Sized,
    {
        match self.indent.as_deref() {
            Some(indent) if !indent.is_empty() => {
                let mut buf = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
                request
                    .serialize(&mut serializer)
                    .map_err(ClientError::Payload)?;
                Ok(buf)
            }
            _ => serde_json::to_vec(request).map_err(ClientError::Payload),
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
