//! Test doubles shared by the unit tests.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::graphics::{Capability, ClearMask, GraphicsContext};
use crate::resource::{DecodedImage, ImageHandle};
use crate::transport::{
    HttpResponder, ImageResponder, ImageResult, RequestHandle, Transport, TransportRequest,
    TransportResponse,
};

#[derive(Default)]
struct Pending {
    requests: Vec<TransportRequest>,
    http: Vec<(String, HttpResponder)>,
    images: Vec<(String, ImageResponder)>,
    aborted: Vec<String>,
}

/// Transport whose requests stay outstanding until the test answers them,
/// in whatever order the test chooses.
#[derive(Default)]
pub struct ManualTransport {
    pending: Rc<RefCell<Pending>>,
}

struct ManualHandle {
    url: String,
    pending: Rc<RefCell<Pending>>,
}

impl RequestHandle for ManualHandle {
    fn abort(&mut self) {
        self.pending.borrow_mut().aborted.push(self.url.clone());
    }
}

impl ManualTransport {
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.pending.borrow().requests.clone()
    }

    /// URLs still waiting for an answer, HTTP first, in issue order.
    pub fn outstanding(&self) -> Vec<String> {
        let pending = self.pending.borrow();
        pending
            .http
            .iter()
            .map(|(url, _)| url.clone())
            .chain(pending.images.iter().map(|(url, _)| url.clone()))
            .collect()
    }

    pub fn was_aborted(&self, url: &str) -> bool {
        self.pending.borrow().aborted.iter().any(|u| u == url)
    }

    /// Answer the oldest outstanding HTTP request for `url`. Returns whether
    /// the adapter was still listening.
    pub fn respond(&self, url: &str, status_code: u16, body: &[u8]) -> bool {
        let responder = {
            let mut pending = self.pending.borrow_mut();
            match pending.http.iter().position(|(u, _)| u == url) {
                Some(index) => pending.http.remove(index).1,
                None => return false,
            }
        };
        responder
            .send(TransportResponse {
                status_code,
                body: body.to_vec(),
            })
            .is_ok()
    }

    pub fn respond_image(&self, url: &str, result: ImageResult) -> bool {
        let responder = {
            let mut pending = self.pending.borrow_mut();
            match pending.images.iter().position(|(u, _)| u == url) {
                Some(index) => pending.images.remove(index).1,
                None => return false,
            }
        };
        responder.send(result).is_ok()
    }

    /// Forget a request without answering it.
    pub fn drop_responder(&self, url: &str) {
        let mut pending = self.pending.borrow_mut();
        pending.http.retain(|(u, _)| u != url);
        pending.images.retain(|(u, _)| u != url);
    }

    fn handle(&self, url: &str) -> Box<dyn RequestHandle> {
        Box::new(ManualHandle {
            url: url.to_string(),
            pending: self.pending.clone(),
        })
    }
}

impl Transport for ManualTransport {
    fn send(&self, request: TransportRequest, responder: HttpResponder) -> Box<dyn RequestHandle> {
        let url = request.url.clone();
        {
            let mut pending = self.pending.borrow_mut();
            pending.requests.push(request);
            pending.http.push((url.clone(), responder));
        }
        self.handle(&url)
    }

    fn load_image(&self, url: &str, responder: ImageResponder) -> Box<dyn RequestHandle> {
        self.pending
            .borrow_mut()
            .images
            .push((url.to_string(), responder));
        self.handle(url)
    }
}

pub struct TestImage {
    width: u32,
    height: u32,
}

impl TestImage {
    pub fn handle(width: u32, height: u32) -> ImageHandle {
        Rc::new(TestImage { width, height })
    }
}

impl DecodedImage for TestImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Graphics context recording every call it receives.
#[derive(Debug, Default)]
pub struct RecordingContext {
    pub calls: Vec<GlCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    ClearColor([f32; 4]),
    ClearDepth(f32),
    Enable(Capability),
    Clear(ClearMask),
}

impl GraphicsContext for RecordingContext {
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.calls.push(GlCall::ClearColor([r, g, b, a]));
    }

    fn clear_depth(&mut self, depth: f32) {
        self.calls.push(GlCall::ClearDepth(depth));
    }

    fn enable(&mut self, capability: Capability) {
        self.calls.push(GlCall::Enable(capability));
    }

    fn clear(&mut self, mask: ClearMask) {
        self.calls.push(GlCall::Clear(mask));
    }
}
