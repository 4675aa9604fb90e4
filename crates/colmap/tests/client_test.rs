//! Integration tests for HttpSuggestionClient against a local endpoint.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use colmap::{
    HttpSuggestionClient, MappingSession, Phase, SuggestionClient, SuggestionRequest,
    DEFAULT_TARGET_FIELD,
};

/// Serve exactly one HTTP request, answering with `status` and `body`.
///
/// Returns the endpoint URL and a handle yielding the request body received.
fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("Failed to accept");
        let mut reader = BufReader::new(stream);

        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("Failed to read header");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }

        let mut request_body = vec![0; content_length];
        reader
            .read_exact(&mut request_body)
            .expect("Failed to read body");

        let reason = if status == 200 { "OK" } else { "Internal Server Error" };
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        let mut stream = reader.into_inner();
        stream
            .write_all(response.as_bytes())
            .expect("Failed to write response");

        String::from_utf8(request_body).expect("Request body not UTF-8")
    });

    (format!("http://{}/api/normalize", addr), handle)
}

fn client(endpoint: &str) -> HttpSuggestionClient {
    HttpSuggestionClient::with_timeout(endpoint, Duration::from_secs(5))
        .expect("Failed to build client")
}

fn request() -> SuggestionRequest {
    serde_json::from_str(r#"{"data": {"Variable / Field Name": ["age", null, "sex"]}}"#)
        .expect("Invalid request JSON")
}

#[test]
fn test_posts_batch_and_decodes_response() {
    let (endpoint, server) = serve_once(
        200,
        r#"{"Variable / Field Name": {"primary": "field_name"},
            "age": {"primary": "Age", "alternatives": ["AGE", "age_years"]}}"#,
    );

    let set = client(&endpoint).request_suggestions(&request()).unwrap();
    let sent = server.join().unwrap();

    assert_eq!(
        sent,
        r#"{"data":{"Variable / Field Name":["age",null,"sex"]}}"#
    );
    assert_eq!(set.len(), 2);
    assert!(set.get(DEFAULT_TARGET_FIELD).unwrap().alternatives.is_empty());
    assert_eq!(set.get("age").unwrap().choices(), vec!["Age", "AGE", "age_years"]);
}

#[test]
fn test_server_error_is_service_error() {
    let (endpoint, server) = serve_once(500, "");

    let err = client(&endpoint).request_suggestions(&request()).unwrap_err();
    server.join().unwrap();

    assert!(err.is_service());
    assert_eq!(err.to_string(), "Failed to submit data: Server error: 500");
}

#[test]
fn test_undecodable_body_is_service_error() {
    let (endpoint, server) = serve_once(200, r#"{"age": "Age"}"#);

    let err = client(&endpoint).request_suggestions(&request()).unwrap_err();
    server.join().unwrap();

    assert!(err.is_service());
    assert!(err.to_string().contains("invalid response body"));
}

#[test]
fn test_unreachable_endpoint_is_service_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}/api/normalize", addr))
        .request_suggestions(&request())
        .unwrap_err();
    assert!(err.is_service());
}

#[test]
fn test_session_over_http() {
    let (endpoint, server) = serve_once(
        200,
        r#"{"Variable / Field Name": {"primary": "field_name"},
            "age": {"primary": "age_years"}}"#,
    );

    let mut session = MappingSession::new();
    session
        .load_file(
            "dict.csv",
            b"Variable / Field Name,Field Label\nrecord_id,ID\nage,Age\n",
        )
        .unwrap();
    session.toggle_column(DEFAULT_TARGET_FIELD).unwrap();
    session.submit(&client(&endpoint)).unwrap();
    server.join().unwrap();

    assert_eq!(session.phase(), Phase::ReviewingSuggestions);
    session.apply().unwrap();
    assert_eq!(
        session.transformed().unwrap().dataset.get(1, DEFAULT_TARGET_FIELD),
        Some("age_years")
    );
}
