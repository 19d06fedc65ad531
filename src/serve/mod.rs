// Read-only HTTP surface for the visualizer
//
// `/api/codemap` returns the generated JSON artifact verbatim; every other
// path is served from the static-assets directory. GET only, no caching
// headers, no write endpoints.

use crate::error::{Error, Result};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;

/// Serve the artifact and the visualizer's static files on `addr`
pub fn serve(addr: &str, json_path: &Path, viz_dir: &Path) -> Result<()> {
    let addr = normalize_addr(addr);
    let listener = TcpListener::bind(&addr)
        .map_err(|e| Error::server(format!("failed to bind to {}: {}", addr, e)))?;

    println!("Serving visualization at http://{}", addr);

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let json_path = json_path.to_path_buf();
                let viz_dir = viz_dir.to_path_buf();
                std::thread::spawn(move || {
                    if let Err(e) = handle_request(stream, &json_path, &viz_dir) {
                        eprintln!("Request error: {}", e);
                    }
                });
            }
            Err(e) => eprintln!("Connection error: {}", e),
        }
    }

    Ok(())
}

/// Accept Go-style `:8080` bind shorthand
fn normalize_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}

/// Handle a single HTTP request
fn handle_request(mut stream: TcpStream, json_path: &Path, viz_dir: &Path) -> Result<()> {
    let mut buffer = [0; 4096];
    let n = stream.read(&mut buffer)?;
    let request = String::from_utf8_lossy(&buffer[..n]);

    // Parse request line
    let request_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = request_line.split_whitespace().collect();

    if parts.len() < 2 {
        send_response(&mut stream, 400, "Bad Request", "text/plain", b"Bad Request")?;
        return Ok(());
    }

    let method = parts[0];
    let path = parts[1];

    if method != "GET" {
        send_response(
            &mut stream,
            405,
            "Method Not Allowed",
            "text/plain",
            b"Method Not Allowed",
        )?;
        return Ok(());
    }

    let url_path = urlparse(path);

    if url_path == "/api/codemap" {
        match std::fs::read(json_path) {
            Ok(content) => {
                send_response(&mut stream, 200, "OK", "application/json", &content)?;
                println!("200 {} {}", method, path);
            }
            Err(_) => {
                send_response(&mut stream, 404, "Not Found", "text/plain", b"Not Found")?;
                println!("404 {} {}", method, path);
            }
        }
        return Ok(());
    }

    serve_static(&mut stream, method, path, &url_path, viz_dir)
}

/// Serve a file from the static-assets directory
fn serve_static(
    stream: &mut TcpStream,
    method: &str,
    raw_path: &str,
    url_path: &str,
    root: &Path,
) -> Result<()> {
    let file_path = if url_path == "/" {
        root.join("index.html")
    } else {
        let relative = url_path.trim_start_matches('/');
        root.join(relative)
    };

    // Security: prevent path traversal
    let canonical = match file_path.canonicalize() {
        Ok(p) => p,
        Err(_) => {
            send_response(stream, 404, "Not Found", "text/plain", b"Not Found")?;
            return Ok(());
        }
    };

    let root_canonical = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    if !canonical.starts_with(&root_canonical) {
        send_response(stream, 403, "Forbidden", "text/plain", b"Forbidden")?;
        return Ok(());
    }

    // Handle directory by looking for index.html
    let final_path = if canonical.is_dir() {
        canonical.join("index.html")
    } else {
        canonical
    };

    match std::fs::read(&final_path) {
        Ok(content) => {
            let content_type = content_type_for(&final_path);
            send_response(stream, 200, "OK", content_type, &content)?;
            println!("200 {} {}", method, raw_path);
        }
        Err(_) => {
            send_response(stream, 404, "Not Found", "text/plain", b"Not Found")?;
            println!("404 {} {}", method, raw_path);
        }
    }

    Ok(())
}

/// Send an HTTP response
fn send_response(
    stream: &mut TcpStream,
    status_code: u16,
    status_text: &str,
    content_type: &str,
    body: &[u8],
) -> Result<()> {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status_code,
        status_text,
        content_type,
        body.len()
    );

    stream.write_all(response.as_bytes())?;
    stream.write_all(body)?;
    stream.flush()?;

    Ok(())
}

/// Content type by extension. Stylesheets and scripts are pinned to the
/// types the visualizer's module loader requires.
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Simple URL decoding
fn urlparse(s: &str) -> String {
    // Split off query string
    let path = s.split('?').next().unwrap_or(s);

    // Decode percent-encoded characters
    let mut result = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte as char);
            } else {
                result.push('%');
                result.push_str(&hex);
            }
        } else {
            result.push(c);
        }
    }

    result
}
