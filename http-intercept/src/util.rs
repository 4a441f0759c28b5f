use crate::{
    data::{FileAttachment, RequestOptions},
    error::Error,
};
use hyper::{
    header::{HeaderName, HeaderValue, CONTENT_TYPE},
    HeaderMap,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use url::form_urlencoded;
use uuid::Uuid;

pub(crate) const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EncodedBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl EncodedBody {
    fn is_multipart(&self) -> bool {
        self.content_type.starts_with("multipart/")
    }
}

pub fn extract_headers(header_map: &HeaderMap) -> HashMap<String, String> {
    // it currently ignores header values with opaque characters
    header_map
        .iter()
        .map(|(k, v)| (String::from(k.as_str()), v.to_str()))
        .filter_map(|(key, value)| value.ok().map(|v| (key, String::from(v))))
        .collect::<HashMap<_, _>>()
}

pub fn put_headers<'a, I: IntoIterator<Item = (&'a String, &'a String)>>(
    header_map: &mut HeaderMap<HeaderValue>,
    headers: I,
) -> Result<(), Error> {
    for (key, value) in headers {
        let header_name = HeaderName::from_lowercase(key.to_lowercase().as_bytes())?;
        let header_value = HeaderValue::from_str(value)?;
        header_map.append(header_name, header_value);
    }

    Ok(())
}

/// Puts the request headers and, unless the caller already chose one, the content type of the
/// encoded body into `header_map`. A multipart content type always wins since it carries the
/// boundary.
pub(crate) fn put_request_headers(
    header_map: &mut HeaderMap<HeaderValue>,
    options: &RequestOptions,
    body: Option<&EncodedBody>,
) -> Result<(), Error> {
    put_headers(header_map, &options.headers)?;

    if let Some(body) = body {
        if body.is_multipart() || !header_map.contains_key(CONTENT_TYPE) {
            header_map.insert(CONTENT_TYPE, HeaderValue::from_str(&body.content_type)?);
        }
    }

    Ok(())
}

/// Returns `url` with `params` merged into its query string. Keys present in `params` replace
/// the ones already in the query. Without params the url is returned untouched.
pub fn url_with_params(url: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url.into();
    }

    let (without_fragment, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    let (base, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(
        form_urlencoded::parse(query.as_bytes())
            .filter(|(key, _)| !params.iter().any(|(name, _)| name == key)),
    );
    serializer.extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let mut result = format!("{}?{}", base, serializer.finish());
    if let Some(fragment) = fragment {
        result.push('#');
        result.push_str(fragment);
    }

    result
}

/// Encodes the request body for the real clients. `data` wins over `files`.
pub(crate) fn encode_body(options: &RequestOptions) -> Result<Option<EncodedBody>, Error> {
    if let Some(data) = &options.data {
        return Ok(Some(match data {
            Value::String(text) => EncodedBody {
                content_type: "text/plain; charset=utf-8".into(),
                bytes: text.clone().into_bytes(),
            },
            Value::Object(fields) => {
                let mut serializer = form_urlencoded::Serializer::new(String::new());
                for (key, value) in fields {
                    match value {
                        Value::String(text) => serializer.append_pair(key, text),
                        other => serializer.append_pair(key, &other.to_string()),
                    };
                }

                EncodedBody {
                    content_type: "application/x-www-form-urlencoded".into(),
                    bytes: serializer.finish().into_bytes(),
                }
            }
            other => EncodedBody {
                content_type: "application/json".into(),
                bytes: serde_json::to_vec(other)?,
            },
        }));
    }

    if let Some(files) = &options.files {
        return Ok(Some(encode_multipart(files)));
    }

    Ok(None)
}

/// Multipart encoding for the hyper client; the blocking client hands files to reqwest's own
/// multipart form.
pub(crate) fn encode_multipart(files: &BTreeMap<String, FileAttachment>) -> EncodedBody {
    let boundary = pick_boundary(files, || format!("http-intercept-{}", Uuid::new_v4().simple()));

    let mut bytes = Vec::new();
    for (field, attachment) in files {
        bytes.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: {}\r\n\r\n",
                boundary,
                quote_disposition_value(field),
                quote_disposition_value(&attachment.filename),
                attachment
                    .content_type
                    .as_deref()
                    .unwrap_or(DEFAULT_FILE_CONTENT_TYPE),
            )
            .as_bytes(),
        );
        bytes.extend_from_slice(attachment.content.as_bytes());
        bytes.extend_from_slice(b"\r\n");
    }
    bytes.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    EncodedBody {
        content_type: format!("multipart/form-data; boundary={}", boundary),
        bytes,
    }
}

// the boundary must not show up inside any part
fn pick_boundary<F: FnMut() -> String>(
    files: &BTreeMap<String, FileAttachment>,
    mut generate: F,
) -> String {
    loop {
        let boundary = generate();
        if !files
            .values()
            .any(|attachment| attachment.content.contains(boundary.as_str()))
        {
            return boundary;
        }
    }
}

// RFC 7578 section 4.2: quotes and line breaks in names are percent-encoded
fn quote_disposition_value(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
