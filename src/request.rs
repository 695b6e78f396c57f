//! Request values assembled before dispatch.
//!
//! A [`Request`] is plain data: method, base URL, query parameters, headers
//! and an optional body. Nothing is validated until the request is sent,
//! except header values, which are checked as they are set.

use std::collections::BTreeMap;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;
use url::form_urlencoded;

use crate::constants::CONTENT_TYPE_JSON;
use crate::error::HttpError;

/// An HTTP request described as data.
///
/// `headers` and `params` are always present; both `Request::new` and
/// `Request::default()` start them empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    /// HTTP verb, e.g. `GET`.
    pub method: String,
    /// Target URL without query parameters.
    pub base_url: String,
    /// Request body, sent as-is.
    pub body: Option<Vec<u8>>,
    /// Request headers (case-insensitive keys, multiple values per key).
    pub headers: HeaderMap,
    /// Query parameters, encoded in key order.
    pub params: BTreeMap<String, Vec<String>>,
}

impl Request {
    /// Creates a request with empty headers and parameters.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        base_url: impl Into<String>,
        body: Option<Vec<u8>>,
    ) -> Self {
        Self {
            method: method.into(),
            base_url: base_url.into(),
            body,
            headers: HeaderMap::new(),
            params: BTreeMap::new(),
        }
    }

    /// Sets the `Content-Type` header.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidHeader`] if `value` is not a valid header value.
    pub fn set_content_type(&mut self, value: &str) -> Result<(), HttpError> {
        let value = header_value(CONTENT_TYPE.as_str(), value)?;
        self.headers.insert(CONTENT_TYPE, value);
        Ok(())
    }

    /// Sets the `Content-Type` header to `application/json`.
    pub fn set_content_type_json(&mut self) {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    }

    /// Sets the `Authorization` header.
    ///
    /// The value is marked sensitive so it is redacted from debug output.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidHeader`] if `value` is not a valid header value.
    pub fn set_authorization(&mut self, value: &str) -> Result<(), HttpError> {
        let mut value = header_value(AUTHORIZATION.as_str(), value)?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    /// Replaces all values of a header with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidHeader`] if the name or value is invalid.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), HttpError> {
        let (name, value) = header_pair(name, value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Appends `value` to a header, keeping existing values.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidHeader`] if the name or value is invalid.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), HttpError> {
        let (name, value) = header_pair(name, value)?;
        self.headers.append(name, value);
        Ok(())
    }

    /// Appends a query parameter value.
    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let values = self.params.entry(key.into()).or_default();
        values.push(value.into());
    }

    /// Serializes `value` as the JSON body and sets the JSON content type.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Encode`] if serialization fails.
    pub fn set_json_body<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), HttpError> {
        let body = serde_json::to_vec(value).map_err(|source| HttpError::Encode { source })?;
        self.body = Some(body);
        self.set_content_type_json();
        Ok(())
    }

    /// Returns the URL the request will be sent to.
    ///
    /// With parameters this is `base_url?encoded`. A `?` already present in
    /// `base_url` is not merged, so such URLs end up with two.
    #[must_use]
    pub fn url(&self) -> String {
        if self.params.is_empty() {
            return self.base_url.clone();
        }
        format!("{}?{}", self.base_url, encode_params(&self.params))
    }

    /// Converts into a `reqwest::Request` ready for dispatch.
    pub(crate) fn build(&self) -> Result<reqwest::Request, HttpError> {
        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| HttpError::invalid_method(self.method.clone()))?;
        let target = self.url();
        let url = Url::parse(&target).map_err(|_| HttpError::invalid_url(target.clone()))?;

        let mut request = reqwest::Request::new(method, url);
        request.headers_mut().clone_from(&self.headers);
        if let Some(body) = &self.body {
            *request.body_mut() = Some(body.clone().into());
        }
        Ok(request)
    }
}

/// Encodes parameters as `application/x-www-form-urlencoded`, keys sorted.
pub(crate) fn encode_params(params: &BTreeMap<String, Vec<String>>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, values) in params {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, HttpError> {
    HeaderValue::from_str(value).map_err(|e| HttpError::invalid_header(name, e))
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), HttpError> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| HttpError::invalid_header(name, e))?;
    Ok((header_name, header_value(name, value)?))
}
