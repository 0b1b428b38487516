use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ferry::http::handler::{Handler, invoke, respond};
use ferry::http::request::{Method, Request, RequestBuilder};
use ferry::http::response::{
    BAD_REQUEST_BODY, HTML_CONTENT_TYPE, INTERNAL_ERROR_BODY, NOT_FOUND_BODY, Response, StatusCode,
};

const GET_ROOT: &str = "GET / HTTP/1.1\r\nHost: x\r\n\r\n";

fn get(path: &str) -> Request {
    RequestBuilder::new()
        .method(Method::GET)
        .path(path)
        .build()
        .unwrap()
}

#[test]
fn test_body_defaults_to_html_content_type() {
    let handler = |_: &Request, _: &mut Response| -> anyhow::Result<String> { Ok("hello".into()) };

    let response = respond(Some(&handler), GET_ROOT);

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("Content-Type"), Some(HTML_CONTENT_TYPE));
    assert_eq!(response.body_bytes(), b"hello");
}

#[test]
fn test_handler_content_type_is_kept() {
    let handler = |_: &Request, resp: &mut Response| -> anyhow::Result<String> {
        resp.set_header("content-type", "application/json");
        Ok("{}".into())
    };

    let response = respond(Some(&handler), GET_ROOT);

    assert_eq!(response.header("Content-Type"), Some("application/json"));
    assert_eq!(response.headers.len(), 1);
}

#[test]
fn test_handler_status_and_headers_survive() {
    let handler = |_: &Request, resp: &mut Response| -> anyhow::Result<String> {
        resp.set_status(StatusCode::Created);
        resp.set_header("Location", "/items/1");
        Ok("created".into())
    };

    let response = invoke(&handler, &get("/items"));

    assert_eq!(response.status, Some(StatusCode::Created));
    assert_eq!(response.header("Location"), Some("/items/1"));
}

#[test]
fn test_empty_body_leaves_response_untouched() {
    let handler = |_: &Request, resp: &mut Response| -> anyhow::Result<String> {
        resp.set_status(StatusCode::NoContent);
        Ok(String::new())
    };

    let response = invoke(&handler, &get("/"));

    assert_eq!(response.status, Some(StatusCode::NoContent));
    assert_eq!(response.body, None);
    assert!(!response.has_header("Content-Type"));
}

#[test]
fn test_blank_body_counts_as_empty() {
    let handler = |_: &Request, _: &mut Response| -> anyhow::Result<String> { Ok("  \r\n".into()) };

    let response = invoke(&handler, &get("/"));

    assert_eq!(response.body, None);
    assert!(!response.has_header("Content-Type"));
}

#[test]
fn test_handler_error_becomes_500() {
    let handler = |_: &Request, resp: &mut Response| -> anyhow::Result<String> {
        resp.set_header("X-Partial", "yes");
        anyhow::bail!("database unavailable")
    };

    let response = respond(Some(&handler), GET_ROOT);

    assert_eq!(response.status_code(), 500);
    assert_eq!(response.reason_phrase(), "Internal server error");
    assert_eq!(response.header("Content-Type"), Some(HTML_CONTENT_TYPE));
    assert_eq!(response.body_bytes(), INTERNAL_ERROR_BODY.as_bytes());
    // The partially built response is discarded.
    assert!(!response.has_header("X-Partial"));
}

#[test]
fn test_handler_panic_becomes_500() {
    let handler = |_: &Request, _: &mut Response| -> anyhow::Result<String> {
        panic!("handler bug");
    };

    let response = respond(Some(&handler), GET_ROOT);

    assert_eq!(response, Response::internal_error());
}

#[test]
fn test_no_handler_is_404_for_any_request() {
    for text in [GET_ROOT, "POST /form HTTP/1.1\r\n\r\nx=1", "", "garbage"] {
        let response = respond(None, text);

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.reason_phrase(), "Not found");
        assert_eq!(response.header("Content-Type"), Some(HTML_CONTENT_TYPE));
        assert_eq!(response.body_bytes(), NOT_FOUND_BODY.as_bytes());
    }
}

#[test]
fn test_unparseable_request_skips_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let handler = move |_: &Request, _: &mut Response| -> anyhow::Result<String> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok("never".into())
    };

    let response = respond(Some(&handler), "BREW /pot HTTP/1.1\r\n\r\n");

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.body_bytes(), BAD_REQUEST_BODY.as_bytes());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_handler_sees_parsed_request() {
    let handler = |req: &Request, _: &mut Response| -> anyhow::Result<String> {
        Ok(format!(
            "{} {} {}",
            req.method.as_str(),
            req.path,
            req.header("host").unwrap_or("-")
        ))
    };

    let response = respond(Some(&handler), "PUT /a?b=c HTTP/1.1\r\nHost: example\r\n\r\n");

    assert_eq!(response.body_bytes(), b"PUT /a?b=c example");
}

struct Counting {
    calls: AtomicUsize,
}

impl Handler for Counting {
    fn handle(&self, _request: &Request, _response: &mut Response) -> anyhow::Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("call {}", n))
    }
}

#[test]
fn test_struct_handler_through_trait_object() {
    let handler: Arc<dyn Handler> = Arc::new(Counting {
        calls: AtomicUsize::new(0),
    });

    let first = respond(Some(handler.as_ref()), GET_ROOT);
    let second = respond(Some(handler.as_ref()), GET_ROOT);

    assert_eq!(first.body_bytes(), b"call 1");
    assert_eq!(second.body_bytes(), b"call 2");
}
