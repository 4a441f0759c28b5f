use crate::error::Error;
use http_intercept::{FileAttachment, HttpClients, Method, RequestOptions, ResponseData};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Body of an outbound workflow request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum NodeBody {
    #[default]
    None,
    Data(Value),
    Files(BTreeMap<String, FileAttachment>),
}

/// Workflow node that performs one HTTP request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequestNode {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub params: Vec<(String, String)>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: NodeBody,
}

impl HttpRequestNode {
    pub fn new<S1: Into<String>, S2: Into<String>>(method: S1, url: S2) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            params: Vec::new(),
            headers: HashMap::new(),
            body: NodeBody::None,
        }
    }

    fn validate(&self) -> Result<(Method, RequestOptions), Error> {
        let method: Method = self.method.parse()?;

        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(Error::InvalidNode(format!(
                "url should start with http:// or https://, got \"{}\"",
                self.url
            )));
        }

        let mut options = RequestOptions::new()
            .with_params(self.params.iter().cloned())
            .with_headers(self.headers.clone());
        match &self.body {
            NodeBody::None => {}
            NodeBody::Data(data) => options = options.with_data(data.clone()),
            NodeBody::Files(files) => options.files = Some(files.clone()),
        }

        Ok((method, options))
    }
}

/// What a finished node hands to the next node of the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOutput {
    pub status_code: u16,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl From<ResponseData> for NodeOutput {
    fn from(response: ResponseData) -> Self {
        NodeOutput {
            status_code: response.status_code,
            body: response.text().into_owned(),
            url: response.url,
            headers: response.headers,
        }
    }
}

/// Builder used to build a HttpRequestNodeRunner instance
#[derive(Debug, Default)]
pub struct HttpRequestNodeRunnerBuilder<'a> {
    http_clients: Option<&'a HttpClients>,
    fail_on_error_status: bool,
}

impl<'a> HttpRequestNodeRunnerBuilder<'a> {
    pub fn new() -> Self {
        Self {
            http_clients: None,
            fail_on_error_status: false,
        }
    }

    /// Resolve clients from `http_clients` instead of the global registry.
    pub fn with_http_clients(mut self, http_clients: &'a HttpClients) -> Self {
        self.http_clients = Some(http_clients);
        self
    }

    /// Turn 4xx and 5xx answers into [`Error::ErrorStatus`].
    pub fn with_fail_on_error_status(mut self, value: bool) -> Self {
        self.fail_on_error_status = value;
        self
    }

    pub fn build(self) -> HttpRequestNodeRunner<'a> {
        HttpRequestNodeRunner {
            http_clients: self.http_clients.unwrap_or_else(|| HttpClients::global()),
            fail_on_error_status: self.fail_on_error_status,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HttpRequestNodeRunner<'a> {
    http_clients: &'a HttpClients,
    fail_on_error_status: bool,
}

impl HttpRequestNodeRunner<'static> {
    pub fn new() -> Self {
        HttpRequestNodeRunnerBuilder::new().build()
    }
}

impl<'a> HttpRequestNodeRunner<'a> {
    pub fn run(&self, node: &HttpRequestNode) -> Result<NodeOutput, Error> {
        let (method, options) = node.validate()?;
        debug!(%method, url = %node.url, "running http request node");

        let response = self.http_clients.request(method, &node.url, &options)?;
        self.finish(response)
    }

    pub async fn run_async(&self, node: &HttpRequestNode) -> Result<NodeOutput, Error> {
        let (method, options) = node.validate()?;
        debug!(%method, url = %node.url, "running http request node");

        let response = self
            .http_clients
            .request_async(method, &node.url, &options)
            .await?;
        self.finish(response)
    }

    fn finish(&self, response: ResponseData) -> Result<NodeOutput, Error> {
        if response.status_code >= 400 {
            warn!(
                status_code = response.status_code,
                url = %response.url,
                "http request node got an error status"
            );
            if self.fail_on_error_status {
                return Err(Error::ErrorStatus(response.status_code));
            }
        }

        Ok(response.into())
    }
}

impl Default for HttpRequestNodeRunner<'static> {
    fn default() -> Self {
        Self::new()
    }
}
