//! One-shot loopback HTTP server that replays a canned response and hands
//! back the request it received.

#![allow(dead_code)]

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub struct Fixture {
    pub url: String,
    handle: JoinHandle<io::Result<CapturedRequest>>,
}

impl Fixture {
    /// Serve exactly one request with `status` and `body`.
    pub fn serve(status: u16, reason: &str, body: &str) -> TestResult<Self> {
        Self::serve_after(Duration::ZERO, status, reason, body)
    }

    /// Like [`Fixture::serve`], but wait `delay` after reading the request.
    pub fn serve_after(
        delay: Duration,
        status: u16,
        reason: &str,
        body: &str,
    ) -> TestResult<Self> {
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        Self::serve_raw(delay, response)
    }

    /// Write `response` verbatim and close the connection.
    pub fn serve_raw(delay: Duration, response: String) -> TestResult<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept()?;
            stream.set_read_timeout(Some(Duration::from_secs(5)))?;
            let request = read_request(&mut stream)?;
            thread::sleep(delay);
            stream.write_all(response.as_bytes())?;
            stream.flush()?;
            Ok(request)
        });

        Ok(Fixture {
            url: format!("http://{addr}/endpoint"),
            handle,
        })
    }

    pub fn request(self) -> TestResult<CapturedRequest> {
        let request = self
            .handle
            .join()
            .map_err(|_| "fixture thread panicked")??;
        Ok(request)
    }
}

/// Address on loopback with nothing listening.
pub fn closed_url() -> TestResult<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(format!("http://127.0.0.1:{port}/endpoint"))
}

fn read_request(stream: &mut TcpStream) -> io::Result<CapturedRequest> {
    let mut reader = BufReader::new(stream);

    let mut line = String::new();
    reader.read_line(&mut line)?;
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((key, value)) = trimmed.split_once(':') {
            headers.push((key.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let header = |name: &str| {
        headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };
    if header("transfer-encoding").is_some() {
        return Err(invalid("chunked request bodies are not captured"));
    }
    let length = match header("content-length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| invalid("unparsable content-length"))?,
        None if method == "POST" => return Err(invalid("POST without content-length")),
        None => 0,
    };
    let mut body = vec![0; length];
    reader.read_exact(&mut body)?;

    Ok(CapturedRequest {
        method,
        path,
        headers,
        body,
    })
}

fn invalid(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}
