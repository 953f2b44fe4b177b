//! Scripted API server for driver tests.

use http::{Method, Request, Response, StatusCode};
use kube::Client;
use kube::client::Body;
use serde::Serialize;
use tower_test::mock::{self, Handle};

pub(crate) type ApiHandle = Handle<Request<Body>, Response<Body>>;

/// A client whose requests are answered through the returned handle.
pub(crate) fn client() -> (Client, ApiHandle) {
    let (service, handle) = mock::pair::<Request<Body>, Response<Body>>();
    (Client::new(service, "default"), handle)
}

/// Answer the next request with `status` and `body`; returns the method
/// and path that were requested.
pub(crate) async fn respond(
    handle: &mut ApiHandle,
    status: StatusCode,
    body: &impl Serialize,
) -> (Method, String) {
    let (request, send) = handle.next_request().await.expect("client sent no request");
    let seen = (request.method().clone(), request.uri().path().to_owned());
    let body = serde_json::to_vec(body).expect("response body serializes");
    send.send_response(
        Response::builder()
            .status(status)
            .body(Body::from(body))
            .expect("valid response"),
    );
    seen
}

/// Body of an API refusal.
pub(crate) fn refusal(code: u16, reason: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "reason": reason,
        "message": message,
        "code": code,
    })
}
