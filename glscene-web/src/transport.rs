/// Browser transport: `XMLHttpRequest` for data, `<img>` elements for images
use glscene_core::{
    DecodedImage, HttpResponder, ImageLoadError, ImageResponder, RequestHandle, Transport,
    TransportRequest, TransportResponse,
};
use log::{debug, warn};
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlImageElement, XmlHttpRequest};

/// Makes the browser hand back raw bytes as the low byte of each char
const BINARY_MIME_TYPE: &str = "text/plain; charset=x-user-defined";

/// A loaded `<img>` element, ready to be uploaded as a texture
pub struct WebImage(pub HtmlImageElement);

impl DecodedImage for WebImage {
    fn width(&self) -> u32 {
        self.0.natural_width()
    }

    fn height(&self) -> u32 {
        self.0.natural_height()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Undo the `x-user-defined` charset mapping of a binary response.
pub fn decode_binary_text(text: &str) -> Vec<u8> {
    text.chars().map(|c| (c as u32 & 0xff) as u8).collect()
}

/// Shared slot for a responder; whoever takes it first answers.
type Slot<T> = Rc<RefCell<Option<T>>>;

struct XhrHandle {
    xhr: XmlHttpRequest,
    slot: Slot<HttpResponder>,
    _on_change: Closure<dyn FnMut()>,
}

impl XhrHandle {
    fn open(request: TransportRequest, slot: Slot<HttpResponder>) -> Result<Self, JsValue> {
        let xhr = XmlHttpRequest::new()?;
        xhr.open_with_async(request.method.as_str(), &request.url, true)?;
        if request.binary {
            xhr.override_mime_type(BINARY_MIME_TYPE)?;
        }

        let binary = request.binary;
        let url = request.url.clone();
        let watched = xhr.clone();
        let pending = slot.clone();
        let on_change = Closure::<dyn FnMut()>::new(move || {
            if watched.ready_state() != XmlHttpRequest::DONE {
                return;
            }
            let Some(responder) = pending.borrow_mut().take() else {
                return;
            };

            let status_code = watched.status().unwrap_or(0);
            let text = watched.response_text().ok().flatten().unwrap_or_default();
            let body = if binary {
                decode_binary_text(&text)
            } else {
                text.into_bytes()
            };
            debug!("{url} -> {status_code} ({} bytes)", body.len());
            let _ = responder.send(TransportResponse { status_code, body });
        });
        xhr.set_onreadystatechange(Some(on_change.as_ref().unchecked_ref()));

        match &request.body {
            Some(body) => {
                let buffer: js_sys::Object = js_sys::Uint8Array::from(body.as_slice()).into();
                xhr.send_with_opt_buffer_source(Some(&buffer))?;
            }
            None => xhr.send()?,
        }

        Ok(Self {
            xhr,
            slot,
            _on_change: on_change,
        })
    }
}

impl RequestHandle for XhrHandle {
    fn abort(&mut self) {
        // abort() can fire readystatechange synchronously
        self.slot.borrow_mut().take();
        self.xhr.set_onreadystatechange(None);
        if let Err(err) = self.xhr.abort() {
            warn!("abort failed: {err:?}");
        }
    }
}

impl Drop for XhrHandle {
    fn drop(&mut self) {
        // the closure is about to be freed
        self.xhr.set_onreadystatechange(None);
    }
}

struct ImageLoadHandle {
    element: HtmlImageElement,
    slot: Slot<ImageResponder>,
    _on_load: Closure<dyn FnMut()>,
    _on_error: Closure<dyn FnMut()>,
}

impl ImageLoadHandle {
    fn open(url: &str, slot: Slot<ImageResponder>) -> Result<Self, JsValue> {
        let element = HtmlImageElement::new()?;

        let loaded = element.clone();
        let pending = slot.clone();
        let on_load = Closure::<dyn FnMut()>::new(move || {
            if let Some(responder) = pending.borrow_mut().take() {
                let image: Rc<dyn DecodedImage> = Rc::new(WebImage(loaded.clone()));
                let _ = responder.send(Ok(image));
            }
        });

        let failed_url = url.to_string();
        let pending = slot.clone();
        let on_error = Closure::<dyn FnMut()>::new(move || {
            if let Some(responder) = pending.borrow_mut().take() {
                let _ = responder.send(Err(ImageLoadError::Failed {
                    url: failed_url.clone(),
                    reason: "image element reported an error".to_string(),
                }));
            }
        });

        element.set_onload(Some(on_load.as_ref().unchecked_ref()));
        element.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        element.set_src(url);

        Ok(Self {
            element,
            slot,
            _on_load: on_load,
            _on_error: on_error,
        })
    }

    fn detach(&self) {
        self.element.set_onload(None);
        self.element.set_onerror(None);
    }
}

impl RequestHandle for ImageLoadHandle {
    fn abort(&mut self) {
        self.slot.borrow_mut().take();
        self.detach();
        self.element.set_src("");
    }
}

impl Drop for ImageLoadHandle {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Handle for a request the browser refused to start
struct Refused;

impl RequestHandle for Refused {
    fn abort(&mut self) {}
}

/// [`Transport`] backed by the browser's networking
#[derive(Debug, Default, Clone, Copy)]
pub struct WebTransport;

impl Transport for WebTransport {
    fn send(&self, request: TransportRequest, responder: HttpResponder) -> Box<dyn RequestHandle> {
        let url = request.url.clone();
        let slot = Rc::new(RefCell::new(Some(responder)));
        match XhrHandle::open(request, slot.clone()) {
            Ok(handle) => Box::new(handle),
            Err(err) => {
                warn!("could not send request to {url}: {err:?}");
                // same as a network error: status 0
                if let Some(responder) = slot.borrow_mut().take() {
                    let _ = responder.send(TransportResponse::default());
                }
                Box::new(Refused)
            }
        }
    }

    fn load_image(&self, url: &str, responder: ImageResponder) -> Box<dyn RequestHandle> {
        let slot = Rc::new(RefCell::new(Some(responder)));
        match ImageLoadHandle::open(url, slot.clone()) {
            Ok(handle) => Box::new(handle),
            Err(err) => {
                warn!("could not load image {url}: {err:?}");
                if let Some(responder) = slot.borrow_mut().take() {
                    let _ = responder.send(Err(ImageLoadError::Failed {
                        url: url.to_string(),
                        reason: format!("{err:?}"),
                    }));
                }
                Box::new(Refused)
            }
        }
    }
}
