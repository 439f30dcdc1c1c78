//! Loopback HTTP fixtures.

use std::{
    collections::HashMap,
    io::{BufRead, BufReader, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::Arc,
    thread,
};

type Routes = Arc<HashMap<String, (u16, String)>>;

/// A minimal HTTP/1.1 server on `127.0.0.1`; unknown paths are 404s.
///
/// The accept thread is detached, and lives until the test process exits.
pub struct LoopbackServer {
    addr: SocketAddr,
}

impl LoopbackServer {
    /// Serve `(path, status, body)` routes.
    pub fn start(routes: &[(&str, u16, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let routes: Routes = Arc::new(
            routes
                .iter()
                .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
                .collect(),
        );

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else {
                    continue;
                };
                let routes = routes.clone();
                thread::spawn(move || {
                    let _ = respond(stream, &routes);
                });
            }
        });

        Self { addr }
    }

    /// The `http://` URL for `path`.
    pub fn url(
        &self,
        path: &str,
    ) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

fn respond(
    mut stream: TcpStream,
    routes: &Routes,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 || header == "\r\n" {
            break;
        }
    }

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let path = parts.next().unwrap_or_default();

    let (status, body) = routes
        .get(path)
        .cloned()
        .unwrap_or((404, "<!DOCTYPE HTML>\n<html>Not Found</html>".to_string()));
    let reason = if status == 200 { "OK" } else { "Error" };

    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )?;
    if method != "HEAD" {
        stream.write_all(body.as_bytes())?;
    }
    stream.flush()
}
