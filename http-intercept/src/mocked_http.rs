use crate::{
    data::{Method, RequestOptions, ResponseData},
    error::Error,
    http_client::{BlockingHttpClient, HttpClient},
    interception_configuration::NOT_FOUND_URL,
    util,
};
use async_trait::async_trait;
use tracing::debug;

const NOT_FOUND_BODY: &[u8] = b"Not Found";
const OK_BODY: &[u8] = b"OK";

/// Fabricates canned responses instead of talking to the network.
///
/// * the sentinel url answers `404 Not Found`;
/// * any other url answers `200` with the JSON encoded `data`, else the JSON encoded `files`,
///   else `OK`.
///
/// Response headers are the request headers and the response url is the request url with the
/// query params merged in.
#[derive(Debug, Clone)]
pub struct MockedHttp {
    not_found_url: String,
}

impl MockedHttp {
    pub fn new() -> Self {
        Self::with_not_found_url(NOT_FOUND_URL)
    }

    pub fn with_not_found_url<S: Into<String>>(not_found_url: S) -> Self {
        Self {
            not_found_url: not_found_url.into(),
        }
    }

    pub fn not_found_url(&self) -> &str {
        &self.not_found_url
    }

    pub fn fabricate(&self, method: Method, url: &str, options: &RequestOptions) -> ResponseData {
        let response_url = util::url_with_params(url, &options.params);
        let headers = options.headers.clone();

        if url == self.not_found_url {
            debug!(%method, url, "fabricating not found response");
            return ResponseData {
                status_code: 404,
                url: response_url,
                headers,
                body: NOT_FOUND_BODY.to_vec(),
            };
        }

        // serializing a Value or a map of plain strings can't fail
        let body = if let Some(data) = &options.data {
            serde_json::to_vec(data).unwrap_or_default()
        } else if let Some(files) = &options.files {
            serde_json::to_vec(files).unwrap_or_default()
        } else {
            OK_BODY.to_vec()
        };

        debug!(%method, url, body_len = body.len(), "fabricating ok response");
        ResponseData {
            status_code: 200,
            url: response_url,
            headers,
            body,
        }
    }
}

impl Default for MockedHttp {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockedHttp {
    async fn request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<ResponseData, Error> {
        Ok(self.fabricate(method, url, options))
    }
}

impl BlockingHttpClient for MockedHttp {
    fn request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<ResponseData, Error> {
        Ok(self.fabricate(method, url, options))
    }
}
