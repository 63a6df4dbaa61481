//! Response status and size accounting.

use crate::types::Response;
use http::StatusCode;
use http_body::Body;

/// Records the status code and body size a response carried.
///
/// The status defaults to `200 OK`. Once a body write has been recorded the
/// status is frozen, matching what a client actually receives: headers go
/// out before the first body byte.
///
/// # Example
///
/// ```
/// use quiver_middleware::ResponseObserver;
/// use http::StatusCode;
///
/// let mut observer = ResponseObserver::new();
/// observer.record_status(StatusCode::CREATED);
/// observer.record_write(5);
/// observer.record_status(StatusCode::INTERNAL_SERVER_ERROR);
/// observer.record_write(3);
///
/// assert_eq!(observer.status(), StatusCode::CREATED);
/// assert_eq!(observer.bytes_written(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseObserver {
    status: StatusCode,
    bytes_written: u64,
    wrote_body: bool,
}

impl ResponseObserver {
    /// Creates an observer with status `200` and no bytes written.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: StatusCode::OK,
            bytes_written: 0,
            wrote_body: false,
        }
    }

    /// Records an explicitly set status code.
    ///
    /// Ignored once a body write has been recorded.
    pub fn record_status(&mut self, status: StatusCode) {
        if !self.wrote_body {
            self.status = status;
        }
    }

    /// Records a body write of `len` bytes.
    pub fn record_write(&mut self, len: usize) {
        self.wrote_body = true;
        self.bytes_written = self.bytes_written.saturating_add(len as u64);
    }

    /// Records a completed response: its status, then its body length.
    ///
    /// The response itself is left untouched.
    pub fn observe(&mut self, response: &Response) {
        self.record_status(response.status());

        let len = response.body().size_hint().exact().unwrap_or(0);
        if len > 0 {
            self.record_write(usize::try_from(len).unwrap_or(usize::MAX));
        }
    }

    /// Returns the recorded status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the total number of body bytes recorded.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Default for ResponseObserver {
    fn default() -> Self {
        Self::new()
    }
}
