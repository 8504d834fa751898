//! The request value handed to every middleware.

use bytes::Bytes;
use http::request::Parts;
use http::uri::Authority;
use http::{Extensions, HeaderMap, Method, Uri};

/// An HTTP request whose body has already been collected.
///
/// [`Request::extensions_mut`] is how middleware pass values to middleware further
/// down the chain.
#[derive(Debug)]
pub struct Request {
    parts: Parts,
    body: Bytes,
}

impl Request {
    pub fn new(parts: Parts, body: Bytes) -> Self {
        Self { parts, body }
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Returns the URI of the request
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// The request target as sent by the client: path plus query string.
    ///
    /// This is the string middleware path prefixes are matched against. Targets in
    /// authority form (`CONNECT example.com:443`) have no path, so the authority is
    /// returned as is.
    pub fn url(&self) -> &str {
        match self.parts.uri.path_and_query() {
            Some(path_and_query) => path_and_query.as_str(),
            None if self.parts.uri.scheme().is_none() => self.parts.uri.authority().map_or("", Authority::as_str),
            None => "/",
        }
    }

    /// Returns the path of the request, without the query string
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.parts.extensions
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts, body)
    }
}
