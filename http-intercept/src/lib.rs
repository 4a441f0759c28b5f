mod data;
mod error;
mod http_client;
mod http_clients;
mod interception_configuration;
mod interception_scope;
mod mocked_http;
mod util;

pub use data::{FileAttachment, Method, RequestOptions, ResponseData};
pub use error::Error;
pub use http_client::{BlockingHttpClient, HttpClient, HyperHttpClient, ReqwestHttpClient};
pub use http_clients::{ClientEntries, HttpClients};
pub use http_intercept_codegen::http_intercept_test;
pub use interception_configuration::{
    mock_switch_enabled, InterceptionConfiguration, MOCK_SWITCH_VARIABLE, NOT_FOUND_URL,
};
pub use interception_scope::{with_interception, InterceptionScope};
pub use mocked_http::MockedHttp;
