//! The response value handed to every middleware.
//!
//! A [`Response`] accumulates a status code and headers until a middleware ends
//! it with a body. Ending hands the finished `http::Response` to the transport
//! through a one-shot channel at once; middleware further down the chain may
//! still run afterwards, but can no longer change what was sent.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

pub type ResponseBody = Full<Bytes>;

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("response has already been ended")]
    AlreadyEnded,
    #[error("invalid header: {0}")]
    InvalidHeader(#[from] http::Error),
    #[error("failed to serialize json body: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    sender: Option<oneshot::Sender<http::Response<ResponseBody>>>,
}

/// Resolves once the paired [`Response`] is ended.
///
/// Yields `None` if the response was dropped without ever being ended.
#[derive(Debug)]
pub struct PendingResponse {
    receiver: oneshot::Receiver<http::Response<ResponseBody>>,
}

impl Response {
    /// Creates a response together with the handle the transport waits on.
    pub fn channel() -> (Self, PendingResponse) {
        let (sender, receiver) = oneshot::channel();
        let response = Self { status: StatusCode::OK, headers: HeaderMap::new(), sender: Some(sender) };
        (response, PendingResponse { receiver })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Sets a header, replacing any previous value with the same name.
    pub fn set_header<K, V>(&mut self, name: K, value: V) -> Result<(), ResponseError>
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        let name = HeaderName::try_from(name).map_err(|e| ResponseError::InvalidHeader(e.into()))?;
        let value = HeaderValue::try_from(value).map_err(|e| ResponseError::InvalidHeader(e.into()))?;
        self.headers.insert(name, value);
        Ok(())
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.sender.is_none()
    }

    /// Finishes the exchange with `body`.
    pub fn end(&mut self, body: impl Into<Bytes>) -> Result<(), ResponseError> {
        let sender = self.sender.take().ok_or(ResponseError::AlreadyEnded)?;

        let mut response = http::Response::new(Full::new(body.into()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();

        if sender.send(response).is_err() {
            debug!("response ended after the exchange was dropped");
        }
        Ok(())
    }

    /// Ends the exchange with `data` serialized as JSON.
    pub fn json<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<(), ResponseError> {
        if self.is_ended() {
            return Err(ResponseError::AlreadyEnded);
        }
        let body = serde_json::to_vec(data)?;
        self.set_header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())?;
        self.end(body)
    }
}

impl Future for PendingResponse {
    type Output = Option<http::Response<ResponseBody>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(Result::ok)
    }
}

#[cfg(test)]
mod tests {
    use super::{Response, ResponseError};
    use http::StatusCode;
    use http_body_util::BodyExt;
    use serde::Serialize;

    #[tokio::test]
    async fn test_end_sends_response() {
        let (mut res, pending) = Response::channel();
        res.set_status(StatusCode::CREATED);
        res.set_header("x-powered-by", "micro-chain").unwrap();
        res.end("created").unwrap();

        assert!(res.is_ended());

        let response = pending.await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-powered-by"], "micro-chain");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"created");
    }

    #[tokio::test]
    async fn test_json() {
        #[derive(Serialize)]
        struct User {
            id: u32,
            name: &'static str,
        }

        let (mut res, pending) = Response::channel();
        res.json(&User { id: 1, name: "zava" }).unwrap();

        let response = pending.await.unwrap();
        assert_eq!(response.headers()[http::header::CONTENT_TYPE], "application/json");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"id":1,"name":"zava"}"#);
    }

    #[test]
    fn test_end_twice() {
        let (mut res, _pending) = Response::channel();
        res.end("first").unwrap();

        assert!(matches!(res.end("second"), Err(ResponseError::AlreadyEnded)));
        assert!(matches!(res.json(&1), Err(ResponseError::AlreadyEnded)));
    }

    #[test]
    fn test_invalid_header() {
        let (mut res, _pending) = Response::channel();

        assert!(matches!(res.set_header("bad header", "v"), Err(ResponseError::InvalidHeader(_))));
        assert!(res.headers().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_without_end() {
        let (res, pending) = Response::channel();
        drop(res);

        assert!(pending.await.is_none());
    }

    #[test]
    fn test_end_after_transport_gone() {
        let (mut res, pending) = Response::channel();
        drop(pending);

        assert!(res.end("nobody listens").is_ok());
        assert!(res.is_ended());
    }
}
