use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// 出站连接能力：连接到 (host, port)，返回连接和实际使用的本地地址
pub trait Dialer {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    fn dial(
        &self,
        host: &str,
        port: u16,
    ) -> impl Future<Output = io::Result<(Self::Stream, SocketAddr)>> + Send;
}

#[derive(Debug, Clone, Default)]
pub struct TcpDialer {
    connect_timeout: Option<Duration>,
}

impl TcpDialer {
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        Self { connect_timeout }
    }
}

impl Dialer for TcpDialer {
    type Stream = TcpStream;

    async fn dial(&self, host: &str, port: u16) -> io::Result<(TcpStream, SocketAddr)> {
        let connect = TcpStream::connect((host, port));
        let stream = match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connect)
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))??,
            None => connect.await?,
        };
        let local = stream.local_addr()?;
        debug!("已连接 {}:{}，本地地址 {}", host, port, local);
        Ok((stream, local))
    }
}
