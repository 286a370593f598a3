//! The IO capability a host plugs into the fetch adapters.
//!
//! A [`Transport`] receives one request together with a single-use responder
//! and answers it whenever the IO finishes. Responders are oneshot senders,
//! so a transport can deliver at most one outcome per request. Dropping the
//! responder without sending is treated by the adapters as a failed request.

use std::fmt;

use futures::channel::oneshot;

use crate::resource::ImageHandle;

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Head,
    Put,
    Delete,
    Options,
    Trace,
    Connect,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Head => "HEAD",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Vec<u8>>,
    /// Treat the response as raw bytes instead of decoded text.
    pub binary: bool,
}

/// What the transport observed. Status 0 stands for "no HTTP response"
/// (network failure or abort).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageLoadError {
    #[error("image {url} failed to load: {reason}")]
    Failed { url: String, reason: String },
    #[error("image load was dropped by the transport")]
    Dropped,
}

pub type ImageResult = Result<ImageHandle, ImageLoadError>;

pub type HttpResponder = oneshot::Sender<TransportResponse>;
pub type ImageResponder = oneshot::Sender<ImageResult>;

/// Handle to a request in flight.
pub trait RequestHandle {
    /// Stop the underlying IO. The transport may still try to answer; the
    /// adapter has already dropped the receiving end by then.
    fn abort(&mut self);
}

pub trait Transport {
    fn send(&self, request: TransportRequest, responder: HttpResponder) -> Box<dyn RequestHandle>;

    fn load_image(&self, url: &str, responder: ImageResponder) -> Box<dyn RequestHandle>;
}
