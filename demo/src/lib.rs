mod error;
mod http_request_node;

pub use error::Error;
pub use http_request_node::{
    HttpRequestNode, HttpRequestNodeRunner, HttpRequestNodeRunnerBuilder, NodeBody, NodeOutput,
};
