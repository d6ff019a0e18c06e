//! Plain-text liveness endpoint for hosting platforms.

use std::net::SocketAddr;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use tracing::{debug, info};

use crate::errors::AppError;

pub const HEALTH_BODY: &str = "chatledger running\n";

pub struct HealthServer {
    listener: TcpListener,
}

impl HealthServer {
    /// Binds all interfaces on `port`; 0 picks a free port.
    pub async fn bind(port: u16) -> Result<Self, AppError> {
        let listener = TcpListener::bind(("0.0.0.0", port)).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, AppError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the task is dropped.
    pub async fn serve(self) -> Result<(), AppError> {
        info!(addr = %self.local_addr()?, "health endpoint listening");
        loop {
            let (stream, peer) = self.listener.accept().await?;
            tokio::spawn(async move {
                if let Err(err) = respond(stream).await {
                    debug!(%peer, error = %err, "health request failed");
                }
            });
        }
    }
}

async fn respond(mut stream: TcpStream) -> Result<(), AppError> {
    let mut buffer = [0u8; 1024];
    let read = stream.read(&mut buffer).await?;
    let request = String::from_utf8_lossy(&buffer[..read]);
    let response = if request.starts_with("GET ") || request.starts_with("HEAD ") {
        let body = if request.starts_with("HEAD ") { "" } else { HEALTH_BODY };
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            HEALTH_BODY.len(),
            body
        )
    } else {
        "HTTP/1.1 405 Method Not Allowed\r\nAllow: GET, HEAD\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string()
    };
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn exchange(addr: SocketAddr, request: &str) -> String {
        let mut client = TcpStream::connect(("127.0.0.1", addr.port()))
            .await
            .expect("connect");
        client.write_all(request.as_bytes()).await.expect("write");
        let mut response = String::new();
        client.read_to_string(&mut response).await.expect("read");
        response
    }

    #[tokio::test]
    async fn get_returns_running_banner() {
        let server = HealthServer::bind(0).await.expect("bind");
        let addr = server.local_addr().expect("addr");
        tokio::spawn(server.serve());

        let response = exchange(addr, "GET / HTTP/1.1\r\nHost: x\r\n\r\n").await;

        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("Content-Type: text/plain"));
        assert!(response.ends_with("\r\n\r\nchatledger running\n"));
    }

    #[tokio::test]
    async fn other_methods_are_rejected() {
        let server = HealthServer::bind(0).await.expect("bind");
        let addr = server.local_addr().expect("addr");
        tokio::spawn(server.serve());

        let response = exchange(addr, "POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;

        assert!(response.starts_with("HTTP/1.1 405"));
    }
}
