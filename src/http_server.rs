//! HTTP server for the word-count query surface.
//!
//! Serves a local database as the "remote document store" a second dashboard
//! instance queries through `RemoteStore`:
//! - GET /stats - corpus totals
//! - GET /words/{word} - per-publication totals for one word
//! - GET /publications - publication metadata
//! - GET /status - service check

use std::io::Cursor;
use std::sync::Arc;
use tiny_http::{Header, Method, Request, Response, Server};

use crate::db::Database;
use crate::store::WordStore;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Serve the store until the process is stopped.
pub fn serve(db: Arc<Database>, port: u16) -> Result<(), String> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr)
        .map_err(|e| format!("Failed to start server on {}: {}", addr, e))?;
    println!("[HTTP] Word-count store listening on http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &db) {
            eprintln!("[HTTP] Error handling request: {}", e);
        }
    }

    Ok(())
}

fn handle_request(request: Request, db: &Database) -> Result<(), String> {
    let path = request.url().split('?').next().unwrap_or("").to_string();
    let method = request.method().clone();

    println!("[HTTP] {} {}", method, path);

    let response = match (method, path.as_str()) {
        (Method::Get, "/status") => json_response(
            200,
            serde_json::json!({ "service": "pubwords", "version": VERSION }),
        ),
        (Method::Get, "/stats") => handle_stats(db),
        (Method::Get, "/publications") => handle_publications(db),
        (Method::Get, p) if p.starts_with("/words/") => {
            handle_word(db, &p["/words/".len()..])
        }
        _ => json_response(404, serde_json::json!({ "error": "not found" })),
    };

    request
        .respond(response)
        .map_err(|e| format!("Failed to send response: {}", e))
}

fn handle_stats(db: &Database) -> Response<Cursor<Vec<u8>>> {
    match db.query_totals() {
        Ok(totals) => json_value_response(&totals),
        Err(e) => error_response(&e),
    }
}

fn handle_publications(db: &Database) -> Response<Cursor<Vec<u8>>> {
    match db.query_metadata() {
        Ok(metas) => json_value_response(&metas),
        Err(e) => error_response(&e),
    }
}

fn handle_word(db: &Database, raw_word: &str) -> Response<Cursor<Vec<u8>>> {
    let word = match urlencoding::decode(raw_word) {
        Ok(decoded) => decoded.trim().to_lowercase(),
        Err(_) => return json_response(400, serde_json::json!({ "error": "bad word encoding" })),
    };
    if word.is_empty() {
        return json_response(400, serde_json::json!({ "error": "empty word" }));
    }

    match db.query_by_word(&word) {
        Ok(counts) => json_value_response(&counts),
        Err(e) => error_response(&e),
    }
}

fn json_value_response<T: serde::Serialize>(value: &T) -> Response<Cursor<Vec<u8>>> {
    match serde_json::to_string(value) {
        Ok(body) => raw_json_response(200, body),
        Err(e) => error_response(&format!("Serialization failed: {}", e)),
    }
}

fn error_response(message: &str) -> Response<Cursor<Vec<u8>>> {
    json_response(500, serde_json::json!({ "error": message }))
}

fn json_response(status: u16, value: serde_json::Value) -> Response<Cursor<Vec<u8>>> {
    raw_json_response(status, value.to_string())
}

fn raw_json_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap())
}
