//! Fetch adapters: one request in flight per adapter, one completion per
//! request.
//!
//! Completions are pulled with `poll`, which the owner calls from its event
//! loop. Each adapter carries a caller-chosen correlation value `S` that is
//! handed back with the completion.

use std::borrow::Cow;
use std::rc::Rc;

use futures::channel::oneshot;
use log::debug;

use crate::transport::{
    HttpMethod, ImageLoadError, ImageResult, RequestHandle, Transport, TransportRequest,
    TransportResponse,
};

struct InFlight<T, S> {
    handle: Box<dyn RequestHandle>,
    receiver: oneshot::Receiver<T>,
    state: S,
}

enum Outcome<T> {
    Pending,
    Delivered(T),
    Dropped,
}

impl<T, S> InFlight<T, S> {
    fn outcome(&mut self) -> Outcome<T> {
        match self.receiver.try_recv() {
            Ok(Some(value)) => Outcome::Delivered(value),
            Ok(None) => Outcome::Pending,
            Err(oneshot::Canceled) => Outcome::Dropped,
        }
    }
}

/// Completion record of an [`HttpRequest`].
///
/// The adapter does not judge the status code; `status_code == 0` means the
/// request never got an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse<S> {
    pub status_code: u16,
    pub body: Vec<u8>,
    pub state: S,
}

impl<S> HttpResponse<S> {
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Text or binary request adapter.
pub struct HttpRequest<S> {
    transport: Rc<dyn Transport>,
    url: Option<String>,
    in_flight: Option<InFlight<TransportResponse, S>>,
}

impl<S> HttpRequest<S> {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self {
            transport,
            url: None,
            in_flight: None,
        }
    }

    /// URL of the most recent request.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Submit a request, cancelling the one currently in flight.
    pub fn send_request(
        &mut self,
        method: HttpMethod,
        url: impl Into<String>,
        body: Option<Vec<u8>>,
        state: S,
        binary: bool,
    ) {
        self.cancel();

        let url = url.into();
        debug!("{method} {url} (binary: {binary})");

        let (responder, receiver) = oneshot::channel();
        let request = TransportRequest {
            method,
            url: url.clone(),
            body,
            binary,
        };
        let handle = self.transport.send(request, responder);

        self.url = Some(url);
        self.in_flight = Some(InFlight {
            handle,
            receiver,
            state,
        });
    }

    /// Abort the request in flight. Its completion will never be reported.
    pub fn cancel(&mut self) {
        if let Some(mut in_flight) = self.in_flight.take() {
            debug!("cancelling request to {:?}", self.url);
            in_flight.handle.abort();
        }
    }

    /// Take the completion of the request in flight, if it has arrived.
    pub fn poll(&mut self) -> Option<HttpResponse<S>> {
        let in_flight = self.in_flight.as_mut()?;
        let response = match in_flight.outcome() {
            Outcome::Pending => return None,
            Outcome::Delivered(response) => response,
            Outcome::Dropped => TransportResponse::default(),
        };

        let in_flight = self.in_flight.take()?;
        Some(HttpResponse {
            status_code: response.status_code,
            body: response.body,
            state: in_flight.state,
        })
    }

    /// Hand a completed response to `delegate` along with this adapter.
    /// Returns whether the delegate ran.
    pub fn dispatch(&mut self, delegate: impl FnOnce(&Self, HttpResponse<S>)) -> bool {
        match self.poll() {
            Some(response) => {
                delegate(self, response);
                true
            }
            None => false,
        }
    }
}

impl<S> Drop for HttpRequest<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Completion record of an [`ImageRequest`].
pub struct ImageResponse<S> {
    pub image: ImageResult,
    pub state: S,
}

/// Image load adapter.
pub struct ImageRequest<S> {
    transport: Rc<dyn Transport>,
    url: Option<String>,
    in_flight: Option<InFlight<ImageResult, S>>,
}

impl<S> ImageRequest<S> {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self {
            transport,
            url: None,
            in_flight: None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start loading `url`, cancelling the load currently in flight.
    pub fn load(&mut self, url: impl Into<String>, state: S) {
        self.cancel();

        let url = url.into();
        debug!("loading image {url}");

        let (responder, receiver) = oneshot::channel();
        let handle = self.transport.load_image(&url, responder);

        self.url = Some(url);
        self.in_flight = Some(InFlight {
            handle,
            receiver,
            state,
        });
    }

    pub fn cancel(&mut self) {
        if let Some(mut in_flight) = self.in_flight.take() {
            debug!("cancelling image load {:?}", self.url);
            in_flight.handle.abort();
        }
    }

    pub fn poll(&mut self) -> Option<ImageResponse<S>> {
        let in_flight = self.in_flight.as_mut()?;
        let image = match in_flight.outcome() {
            Outcome::Pending => return None,
            Outcome::Delivered(result) => result,
            Outcome::Dropped => Err(ImageLoadError::Dropped),
        };

        let in_flight = self.in_flight.take()?;
        Some(ImageResponse {
            image,
            state: in_flight.state,
        })
    }
}

impl<S> Drop for ImageRequest<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}
