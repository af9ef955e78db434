// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A request the mock received
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Unmatched GET and DELETE requests answer 404. Unmatched POST, PUT and PATCH requests
/// echo the request body back, which is what the API server does for a successful create.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Add a response for DELETE requests matching the exact path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Every request received so far that is not a GET
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != "GET")
            .collect()
    }

    /// Requests matching the method and path
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();
        responses
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().replace("%3A", ":");

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            let body = String::from_utf8_lossy(&bytes).to_string();
            requests.lock().unwrap().push(RecordedRequest {
                method: method.clone(),
                path,
                body: body.clone(),
            });

            let (status, body) = match response {
                Some(found) => found,
                None if matches!(method.as_str(), "POST" | "PUT" | "PATCH") => (201, body),
                None => (404, not_found_json("resource", "unknown")),
            };

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Path of a namespaced image.openshift.io/v1 object
pub fn image_path(namespace: &str, plural: &str, name: &str) -> String {
    if name.is_empty() {
        format!("/apis/image.openshift.io/v1/namespaces/{}/{}", namespace, plural)
    } else {
        format!(
            "/apis/image.openshift.io/v1/namespaces/{}/{}/{}",
            namespace, plural, name
        )
    }
}

/// Create a mock ImageStreamTag JSON response
pub fn image_stream_tag_json(
    namespace: &str,
    name: &str,
    digest: &str,
    created: &str,
    reference: &str,
) -> String {
    serde_json::json!({
        "apiVersion": "image.openshift.io/v1",
        "kind": "ImageStreamTag",
        "metadata": {"namespace": namespace, "name": name},
        "image": {
            "metadata": {"name": digest, "creationTimestamp": created},
            "dockerImageReference": reference
        }
    })
    .to_string()
}

/// Create a mock ImageStream JSON response
pub fn image_stream_json(
    namespace: &str,
    name: &str,
    finalizers: &[&str],
    deletion_timestamp: Option<&str>,
) -> String {
    let mut stream = serde_json::json!({
        "apiVersion": "image.openshift.io/v1",
        "kind": "ImageStream",
        "metadata": {
            "namespace": namespace,
            "name": name,
            "resourceVersion": "1",
            "annotations": {
                "release.openshift.io-something": "copied",
                "something": "not-copied"
            },
            "finalizers": finalizers
        },
        "spec": {"lookupPolicy": {"local": true}}
    });
    if let Some(ts) = deletion_timestamp {
        stream["metadata"]["deletionTimestamp"] = serde_json::json!(ts);
    }
    stream.to_string()
}

/// Create a mock ImageStreamImport JSON response. A failure message marks the import as failed.
pub fn image_stream_import_json(namespace: &str, name: &str, failure: Option<&str>) -> String {
    let image_status = match failure {
        Some(message) => serde_json::json!({"status": {"message": message}}),
        None => serde_json::json!({"status": {"status": "Success"}, "image": {}}),
    };
    serde_json::json!({
        "apiVersion": "image.openshift.io/v1",
        "kind": "ImageStreamImport",
        "metadata": {"namespace": namespace, "name": name},
        "spec": {"import": true},
        "status": {"images": [image_status]}
    })
    .to_string()
}
