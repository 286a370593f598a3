/// File-system transport answering scene requests from a local directory
use glscene_core::{
    DecodedImage, HttpMethod, HttpResponder, ImageLoadError, ImageResponder, RequestHandle,
    Transport, TransportRequest, TransportResponse,
};
use log::{debug, warn};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// An RGBA image decoded by the `image` crate
pub struct LoadedImage(pub image::RgbaImage);

impl DecodedImage for LoadedImage {
    fn width(&self) -> u32 {
        self.0.width()
    }

    fn height(&self) -> u32 {
        self.0.height()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

enum Job {
    Http {
        request: TransportRequest,
        responder: HttpResponder,
    },
    Image {
        url: String,
        responder: ImageResponder,
    },
}

struct QueuedJob {
    job: Job,
    aborted: Rc<Cell<bool>>,
}

struct FileHandle {
    aborted: Rc<Cell<bool>>,
}

impl RequestHandle for FileHandle {
    fn abort(&mut self) {
        self.aborted.set(true);
    }
}

/// Queues requests and answers them when the host's frame loop calls
/// [`FileTransport::pump`], so completions arrive asynchronously with
/// respect to the code that issued them.
pub struct FileTransport {
    root: PathBuf,
    queue: RefCell<VecDeque<QueuedJob>>,
}

impl FileTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            queue: RefCell::new(VecDeque::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Answer every queued request. Returns how many were answered.
    pub fn pump(&self) -> usize {
        let jobs: Vec<QueuedJob> = self.queue.borrow_mut().drain(..).collect();
        let mut answered = 0;

        for QueuedJob { job, aborted } in jobs {
            if aborted.get() {
                continue;
            }
            answered += 1;

            match job {
                Job::Http { request, responder } => {
                    let response = self.answer(&request);
                    debug!("{} {} -> {}", request.method, request.url, response.status_code);
                    // the adapter may have gone away in the meantime
                    let _ = responder.send(response);
                }
                Job::Image { url, responder } => {
                    let result = self.decode_image(&url);
                    let _ = responder.send(result);
                }
            }
        }

        answered
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let relative = url.trim_start_matches("file://").trim_start_matches('/');
        self.root.join(relative)
    }

    fn answer(&self, request: &TransportRequest) -> TransportResponse {
        if !matches!(request.method, HttpMethod::Get | HttpMethod::Head) {
            return TransportResponse {
                status_code: 405,
                body: Vec::new(),
            };
        }

        let path = self.resolve(&request.url);
        match std::fs::read(&path) {
            Ok(bytes) => {
                let body = match request.method {
                    HttpMethod::Head => Vec::new(),
                    _ if request.binary => bytes,
                    _ => String::from_utf8_lossy(&bytes).into_owned().into_bytes(),
                };
                TransportResponse {
                    status_code: 200,
                    body,
                }
            }
            Err(err) => {
                warn!("cannot read {}: {err}", path.display());
                let status_code = match err.kind() {
                    io::ErrorKind::NotFound => 404,
                    io::ErrorKind::PermissionDenied => 403,
                    _ => 500,
                };
                TransportResponse {
                    status_code,
                    body: err.to_string().into_bytes(),
                }
            }
        }
    }

    fn decode_image(&self, url: &str) -> Result<Rc<dyn DecodedImage>, ImageLoadError> {
        let path = self.resolve(url);
        match image::open(&path) {
            Ok(image) => Ok(Rc::new(LoadedImage(image.to_rgba8()))),
            Err(err) => Err(ImageLoadError::Failed {
                url: url.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    fn enqueue(&self, job: Job) -> Box<dyn RequestHandle> {
        let aborted = Rc::new(Cell::new(false));
        self.queue.borrow_mut().push_back(QueuedJob {
            job,
            aborted: aborted.clone(),
        });
        Box::new(FileHandle { aborted })
    }
}

impl Transport for FileTransport {
    fn send(&self, request: TransportRequest, responder: HttpResponder) -> Box<dyn RequestHandle> {
        self.enqueue(Job::Http { request, responder })
    }

    fn load_image(&self, url: &str, responder: ImageResponder) -> Box<dyn RequestHandle> {
        self.enqueue(Job::Image {
            url: url.to_string(),
            responder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glscene_core::HttpRequest;

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("glscene-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_answers_only_when_pumped() {
        let root = temp_root("pump");
        std::fs::write(root.join("hello.txt"), "hello").unwrap();

        let transport = Rc::new(FileTransport::new(&root));
        let mut request = HttpRequest::new(transport.clone() as Rc<dyn Transport>);
        request.send_request(HttpMethod::Get, "/hello.txt", None, (), false);

        assert!(request.poll().is_none());
        assert_eq!(transport.pump(), 1);

        let response = request.poll().unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.text(), "hello");
    }

    #[test]
    fn test_missing_file_is_404() {
        let transport = Rc::new(FileTransport::new(temp_root("missing")));
        let mut request = HttpRequest::new(transport.clone() as Rc<dyn Transport>);
        request.send_request(HttpMethod::Get, "nope.bin", None, (), true);
        transport.pump();

        assert_eq!(request.poll().unwrap().status_code, 404);
    }

    #[test]
    fn test_aborted_request_is_skipped() {
        let transport = Rc::new(FileTransport::new(temp_root("abort")));
        let mut request = HttpRequest::new(transport.clone() as Rc<dyn Transport>);
        request.send_request(HttpMethod::Get, "a", None, (), true);
        request.send_request(HttpMethod::Get, "b", None, (), true);

        assert_eq!(transport.pending(), 2);
        assert_eq!(transport.pump(), 1);
        assert_eq!(request.poll().unwrap().status_code, 404);
    }

    #[test]
    fn test_post_is_rejected() {
        let transport = Rc::new(FileTransport::new(temp_root("post")));
        let mut request = HttpRequest::new(transport.clone() as Rc<dyn Transport>);
        request.send_request(HttpMethod::Post, "a", Some(b"x".to_vec()), (), false);
        transport.pump();
        assert_eq!(request.poll().unwrap().status_code, 405);
    }
}
