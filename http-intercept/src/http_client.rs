use crate::{
    data::{FileAttachment, Method, RequestOptions, ResponseData},
    error::Error,
    util,
};
use async_trait::async_trait;
use hyper::{body, client::HttpConnector, header::CONTENT_TYPE, Body, Request};
use hyper_tls::HttpsConnector;
use reqwest::blocking::multipart::{Form, Part};
use std::{collections::BTreeMap, fmt::Debug, sync::OnceLock};
use tracing::debug;

/// Entry point of the async HTTP client flavour.
#[async_trait]
pub trait HttpClient: Debug {
    async fn request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<ResponseData, Error>;
}

/// Entry point of the blocking HTTP client flavour.
pub trait BlockingHttpClient: Debug {
    fn request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<ResponseData, Error>;
}

/// Async client on top of hyper.
///
/// Idle connections are not pooled: a pooled connection belongs to the runtime that opened it,
/// and every `#[tokio::test]` brings its own runtime.
#[derive(Debug)]
pub struct HyperHttpClient {
    client: hyper::Client<HttpsConnector<HttpConnector>>,
}

impl HyperHttpClient {
    pub fn new() -> Self {
        Self {
            client: hyper::Client::builder()
                .pool_max_idle_per_host(0)
                .build(HttpsConnector::new()),
        }
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<ResponseData, Error> {
        let url = util::url_with_params(url, &options.params);
        let encoded_body = util::encode_body(options)?;
        debug!(%method, %url, "sending request through hyper");

        let mut request_builder = Request::builder()
            .uri(url.parse::<hyper::Uri>()?)
            .method(method.to_http_method());

        if let Some(headers_mut) = request_builder.headers_mut() {
            util::put_request_headers(headers_mut, options, encoded_body.as_ref())?;
        }

        let request: Request<Body> = request_builder.body(
            encoded_body
                .map(|encoded| Body::from(encoded.bytes))
                .unwrap_or_else(Body::empty),
        )?;

        let response = self.client.request(request).await?;

        let status_code = response.status().as_u16();
        let headers = util::extract_headers(response.headers());
        let body = body::to_bytes(response.into_body()).await?;

        Ok(ResponseData {
            status_code,
            url,
            headers,
            body: body.to_vec(),
        })
    }
}

impl Default for HyperHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking client on top of `reqwest::blocking`. Must not be called from inside an async
/// runtime.
///
/// The inner client is built on first use, so the value itself can be created (and dropped)
/// anywhere.
#[derive(Debug)]
pub struct ReqwestHttpClient {
    client: OnceLock<reqwest::blocking::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: OnceLock::new(),
        }
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self {
            client: OnceLock::from(client),
        }
    }

    fn client(&self) -> &reqwest::blocking::Client {
        self.client.get_or_init(reqwest::blocking::Client::new)
    }

    fn multipart_form(files: &BTreeMap<String, FileAttachment>) -> Result<Form, Error> {
        let mut form = Form::new();
        for (field, attachment) in files {
            let part = Part::text(attachment.content.clone())
                .file_name(attachment.filename.clone())
                .mime_str(
                    attachment
                        .content_type
                        .as_deref()
                        .unwrap_or(util::DEFAULT_FILE_CONTENT_TYPE),
                )?;
            form = form.part(field.clone(), part);
        }

        Ok(form)
    }
}

impl BlockingHttpClient for ReqwestHttpClient {
    fn request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<ResponseData, Error> {
        let url = util::url_with_params(url, &options.params);
        debug!(%method, %url, "sending request through reqwest");

        let request_builder = self.client().request(method.to_http_method(), url.as_str());
        let request_builder = match (&options.data, &options.files) {
            (None, Some(files)) => {
                let mut headers = hyper::HeaderMap::new();
                util::put_request_headers(&mut headers, options, None)?;
                // the form sets its own content type with the boundary
                headers.remove(CONTENT_TYPE);

                request_builder
                    .headers(headers)
                    .multipart(Self::multipart_form(files)?)
            }
            _ => {
                let encoded_body = util::encode_body(options)?;
                let mut headers = hyper::HeaderMap::new();
                util::put_request_headers(&mut headers, options, encoded_body.as_ref())?;

                let request_builder = request_builder.headers(headers);
                match encoded_body {
                    Some(encoded) => request_builder.body(encoded.bytes),
                    None => request_builder,
                }
            }
        };

        let response = request_builder.send()?;

        let status_code = response.status().as_u16();
        let headers = util::extract_headers(response.headers());
        let url = response.url().to_string();
        let body = response.bytes()?;

        Ok(ResponseData {
            status_code,
            url,
            headers,
            body: body.to_vec(),
        })
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}
