use std::collections::BTreeMap;

/// Content type applied to HTML bodies the server produces or defaults.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Body sent when the handler fails.
pub const INTERNAL_ERROR_BODY: &str = "<html><body><h1>Error happens</h1></body></html>";

/// Body sent when no handler is installed.
pub const NOT_FOUND_BODY: &str = "<html><body><h1>Resource not found</h1></body></html>";

/// Body sent when the request text cannot be parsed.
pub const BAD_REQUEST_BODY: &str = "<html><body><h1>Bad request</h1></body></html>";

/// HTTP status codes a response can carry.
///
/// Common HTTP status codes used in responses:
/// - `Ok` (200): Request successful
/// - `NotFound` (404): Resource not found
/// - `InternalServerError` (500): Server error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 202 Accepted
    Accepted,
    /// 204 No Content
    NoContent,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 302 Found
    Found,
    /// 304 Not Modified
    NotModified,
    /// 400 Bad Request
    BadRequest,
    /// 401 Unauthorized
    Unauthorized,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
    /// 503 Service Unavailable
    ServiceUnavailable,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use ferry::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::Accepted => 202,
            StatusCode::NoContent => 204,
            StatusCode::MovedPermanently => 301,
            StatusCode::Found => 302,
            StatusCode::NotModified => 304,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
            StatusCode::ServiceUnavailable => 503,
        }
    }

    /// Looks up a status by its numeric code.
    pub fn from_u16(code: u16) -> Option<Self> {
        let status = match code {
            200 => StatusCode::Ok,
            201 => StatusCode::Created,
            202 => StatusCode::Accepted,
            204 => StatusCode::NoContent,
            301 => StatusCode::MovedPermanently,
            302 => StatusCode::Found,
            304 => StatusCode::NotModified,
            400 => StatusCode::BadRequest,
            401 => StatusCode::Unauthorized,
            403 => StatusCode::Forbidden,
            404 => StatusCode::NotFound,
            405 => StatusCode::MethodNotAllowed,
            500 => StatusCode::InternalServerError,
            501 => StatusCode::NotImplemented,
            503 => StatusCode::ServiceUnavailable,
            _ => return None,
        };
        Some(status)
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use ferry::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::Accepted => "Accepted",
            StatusCode::NoContent => "No Content",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::Found => "Found",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }
}

/// The response being assembled for one connection.
///
/// Starts empty: no status, no reason, no headers, no body. The handler may
/// fill in any of them; the writer falls back to `200 OK` for an unset status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code, unset until someone picks one
    pub status: Option<StatusCode>,
    /// Reason phrase overriding the status's canonical one
    pub reason: Option<String>,
    /// Header names are unique ignoring ASCII case; iteration is by name
    pub headers: BTreeMap<String, String>,
    /// Response body as bytes
    pub body: Option<Vec<u8>>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use ferry::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// assert_eq!(response.header("content-type"), Some("application/json"));
/// ```
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        let mut response = Response::new();
        response.set_status(status);
        Self { response }
    }

    /// Overrides the reason phrase.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.response.set_reason(reason);
        self
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.response.set_header(key, value);
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.response.set_body(body);
        self
    }

    /// Builds the final Response.
    pub fn build(self) -> Response {
        self.response
    }
}

impl Response {
    /// An empty response with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a 200 OK response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body).build()
    }

    /// The response sent when no handler is installed.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .reason("Not found")
            .header("Content-Type", HTML_CONTENT_TYPE)
            .body(NOT_FOUND_BODY)
            .build()
    }

    /// The response sent when the handler fails.
    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError)
            .reason("Internal server error")
            .header("Content-Type", HTML_CONTENT_TYPE)
            .body(INTERNAL_ERROR_BODY)
            .build()
    }

    /// The response sent when the request text does not parse.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .reason("Bad request")
            .header("Content-Type", HTML_CONTENT_TYPE)
            .body(BAD_REQUEST_BODY)
            .build()
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = Some(reason.into());
    }

    /// Sets a header, replacing any existing header whose name matches
    /// ignoring ASCII case.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&key));
        self.headers.insert(key, value.into());
    }

    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_header(&self, key: &str) -> bool {
        self.header(key).is_some()
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = Some(body.into());
    }

    /// The numeric status that goes on the wire.
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(StatusCode::Ok).as_u16()
    }

    /// The reason phrase that goes on the wire.
    pub fn reason_phrase(&self) -> &str {
        match &self.reason {
            Some(reason) => reason.as_str(),
            None => self.status.unwrap_or(StatusCode::Ok).reason_phrase(),
        }
    }

    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}
