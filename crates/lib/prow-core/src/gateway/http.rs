use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

const ACCEPT_JSON: &str = "application/json";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("API token is not a valid header value")]
    InvalidToken,
}

impl GatewayError {
    /// Upstream status code, if the failure was a non-2xx response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

/// Authenticated HTTP client shared by every upstream call.
///
/// Every request carries `Accept: application/json` and, when a token was
/// configured, `Authorization: Bearer <token>`. Failed calls are not retried.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    authorization: Option<HeaderValue>,
}

impl HttpGateway {
    /// Creates a gateway with a default client.
    ///
    /// # Errors
    /// Returns `GatewayError::InvalidToken` if the token cannot be sent as a header.
    pub fn new(token: Option<&str>) -> GatewayResult<Self> {
        Self::with_client(Client::new(), token)
    }

    /// Creates a gateway around a preconfigured client.
    ///
    /// Blank tokens are treated as absent.
    ///
    /// # Errors
    /// Returns `GatewayError::InvalidToken` if the token cannot be sent as a header.
    pub fn with_client(client: Client, token: Option<&str>) -> GatewayResult<Self> {
        let authorization = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| -> GatewayResult<HeaderValue> {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| GatewayError::InvalidToken)?;
                value.set_sensitive(true);
                Ok(value)
            })
            .transpose()?;
        Ok(Self {
            client,
            authorization,
        })
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authorization.is_some()
    }

    /// Issues a request and decodes the body as JSON when the response says
    /// it is JSON, otherwise as text.
    ///
    /// For `GET` the arguments are query-encoded; for other methods they are
    /// sent as a JSON body. `extra_headers` cannot replace `Accept` or
    /// `Authorization`.
    ///
    /// # Errors
    /// Returns `GatewayError` on transport failure, a non-2xx status, or a
    /// JSON response that does not parse.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        args: Option<&Map<String, Value>>,
        extra_headers: &HeaderMap,
    ) -> GatewayResult<Payload> {
        let mut builder = self.builder_with(method.clone(), url, extra_headers.clone());
        if let Some(args) = args {
            builder = if method == Method::GET {
                builder.query(&query_pairs(args))
            } else {
                builder.json(args)
            };
        }

        let response = send(builder, &method, url).await?;
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("json"));
        let body = response.text().await?;
        if is_json {
            serde_json::from_str(&body)
                .map(Payload::Json)
                .map_err(|err| decode_error(url, &err))
        } else {
            Ok(Payload::Text(body))
        }
    }

    /// Fetches and deserializes a JSON document regardless of its declared
    /// content type.
    ///
    /// # Errors
    /// Returns `GatewayError` on transport failure, a non-2xx status, or a
    /// body that does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> GatewayResult<T> {
        let builder = self.builder(Method::GET, url).query(query);
        let body = send(builder, &Method::GET, url).await?.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(|err| decode_error(url, &err))?;
        serde_json::from_value(value).map_err(|err| decode_error(url, &err))
    }

    /// Fetches a body as raw text.
    ///
    /// # Errors
    /// Returns `GatewayError` on transport failure or a non-2xx status.
    pub async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> GatewayResult<String> {
        let builder = self.builder(Method::GET, url).query(query);
        Ok(send(builder, &Method::GET, url).await?.text().await?)
    }

    fn builder(&self, method: Method, url: &str) -> RequestBuilder {
        self.builder_with(method, url, HeaderMap::new())
    }

    fn builder_with(&self, method: Method, url: &str, mut headers: HeaderMap) -> RequestBuilder {
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
        match &self.authorization {
            Some(value) => {
                headers.insert(AUTHORIZATION, value.clone());
            }
            None => {
                headers.remove(AUTHORIZATION);
            }
        }
        self.client.request(method, url).headers(headers)
    }
}

async fn send(builder: RequestBuilder, method: &Method, url: &str) -> GatewayResult<Response> {
    debug!(%method, url, "sending upstream request");
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(%method, url, status = status.as_u16(), "upstream request failed");
    Err(GatewayError::Upstream {
        status: status.as_u16(),
        body,
    })
}

fn query_pairs(args: &Map<String, Value>) -> Vec<(&str, String)> {
    args.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            Some((key.as_str(), value))
        })
        .collect()
}

fn decode_error(url: &str, err: &serde_json::Error) -> GatewayError {
    GatewayError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    }
}
