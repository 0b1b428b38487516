//! The handler seam and the mapping of its outcomes onto responses.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{error, warn};

use crate::http::request::Request;
use crate::http::response::{HTML_CONTENT_TYPE, Response};

/// Turns a request into a response body.
///
/// The returned string becomes the body; status and headers are set on
/// `response` directly. An `Err` (or a panic) is answered with a 500 and
/// never reaches the client in any other form.
///
/// Closures with the matching signature implement this trait:
///
/// ```
/// use std::sync::Arc;
/// use ferry::http::handler::Handler;
/// use ferry::http::request::Request;
/// use ferry::http::response::Response;
///
/// let handler: Arc<dyn Handler> = Arc::new(
///     |req: &Request, _resp: &mut Response| -> anyhow::Result<String> {
///         Ok(format!("you asked for {}", req.path))
///     },
/// );
/// # let _ = handler;
/// ```
pub trait Handler: Send + Sync {
    fn handle(&self, request: &Request, response: &mut Response) -> anyhow::Result<String>;
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut Response) -> anyhow::Result<String> + Send + Sync,
{
    fn handle(&self, request: &Request, response: &mut Response) -> anyhow::Result<String> {
        self(request, response)
    }
}

/// Builds the response for one request's raw text.
///
/// Without a handler every request gets the fixed 404, whatever it contains.
/// Text that does not parse gets a 400 without reaching the handler.
pub fn respond(handler: Option<&dyn Handler>, text: &str) -> Response {
    let Some(handler) = handler else {
        return Response::not_found();
    };

    let request = match Request::parse(text) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejecting unparseable request");
            return Response::bad_request();
        }
    };

    invoke(handler, &request)
}

/// Runs the handler against a fresh response and folds the outcome in.
pub fn invoke(handler: &dyn Handler, request: &Request) -> Response {
    let mut response = Response::new();

    let outcome = catch_unwind(AssertUnwindSafe(|| handler.handle(request, &mut response)));

    match outcome {
        Ok(Ok(body)) => {
            if !body.trim().is_empty() {
                if !response.has_header("Content-Type") {
                    response.set_header("Content-Type", HTML_CONTENT_TYPE);
                }
                response.set_body(body);
            }
            response
        }
        Ok(Err(e)) => {
            error!(
                error = ?e,
                method = request.method.as_str(),
                path = %request.path,
                "Handler failed"
            );
            Response::internal_error()
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(
                panic = %message,
                method = request.method.as_str(),
                path = %request.path,
                "Handler panicked"
            );
            Response::internal_error()
        }
    }
}
