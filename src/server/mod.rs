use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use crate::settings::Settings;

pub mod api;
pub mod routes;

pub fn run_server(settings: &Settings) -> std::io::Result<()> {
    let listener = TcpListener::bind(&settings.bind_addr)?;
    crate::battle::crt::warm_up();
    tracing::info!(bind = %settings.bind_addr, "antietam server listening");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, settings) {
                    tracing::warn!(%err, "request error");
                }
            }
            Err(err) => tracing::warn!(%err, "connection failed"),
        }
    }

    Ok(())
}

fn handle_connection(stream: &mut TcpStream, settings: &Settings) -> std::io::Result<()> {
    let mut buffer = [0_u8; 16_384];
    let bytes_read = stream.read(&mut buffer)?;
    if bytes_read == 0 {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&buffer[..bytes_read]);
    let mut lines = request.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");

    let body = request
        .split("\r\n\r\n")
        .nth(1)
        .or_else(|| request.split("\n\n").nth(1))
        .unwrap_or("");

    let response = routes::route_request(method, path, body, settings);
    tracing::info!(method, path, status = response.status_code, "request handled");
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}
