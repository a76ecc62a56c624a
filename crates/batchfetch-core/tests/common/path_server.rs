//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of bodies keyed by request path. HEAD answers with
//! Content-Length only; GET sends the body; unknown paths get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Starts a server in a background thread serving `paths` (path -> body).
/// Returns the base URL without trailing slash (e.g. "http://127.0.0.1:12345").
/// The server runs until the process exits.
pub fn start(paths: &[(&str, &str)]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let paths: Arc<HashMap<String, Vec<u8>>> = Arc::new(
        paths
            .iter()
            .map(|(p, body)| (p.to_string(), body.as_bytes().to_vec()))
            .collect(),
    );
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let paths = Arc::clone(&paths);
            thread::spawn(move || handle(stream, &paths));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, paths: &HashMap<String, Vec<u8>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut first = request.lines().next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("/");

    let body = match paths.get(path) {
        Some(body) => body,
        None => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot found",
            );
            return;
        }
    };
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    if method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(body);
    }
}
