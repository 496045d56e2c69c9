use std::net::{Ipv4Addr, SocketAddr};

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::address::Address;
use crate::error::Result;
use crate::protocol::{RESERVED, ReplyType, SOCKS_VERSION};

/// 服务端应答：状态码和绑定地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub reply: ReplyType,
    pub address: Address,
    pub port: u16,
}

impl Response {
    pub fn new(reply: ReplyType, address: impl Into<Address>, port: u16) -> Self {
        Self {
            reply,
            address: address.into(),
            port,
        }
    }

    /// 成功应答，绑定地址为出站连接实际使用的本地地址
    pub fn success(bound: SocketAddr, port: u16) -> Self {
        Self::new(ReplyType::Success, bound.ip(), port)
    }

    /// 失败应答，地址固定为 127.0.0.1:0
    pub fn failure(reply: ReplyType) -> Self {
        Self::new(reply, Ipv4Addr::LOCALHOST, 0)
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(SOCKS_VERSION);
        buf.put_u8(self.reply.into());
        buf.put_u8(RESERVED);
        self.address.encode_with_port(self.port, buf)
    }

    /// 整条应答一次写出
    pub async fn write_to<W>(&self, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut buf = BytesMut::with_capacity(22);
        self.encode(&mut buf)?;
        writer.write_all(&buf).await?;
        writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv6Addr};

    #[tokio::test]
    async fn test_write_ipv4() {
        let response = Response::new(ReplyType::Success, Ipv4Addr::new(192, 168, 0, 5), 9090);
        let mut out = Vec::new();
        response.write_to(&mut out).await.unwrap();
        assert_eq!(out, vec![5, 0, 0, 1, 192, 168, 0, 5, 35, 130]);
    }

    #[tokio::test]
    async fn test_write_dns() {
        let response = Response::new(ReplyType::Success, Address::domain("example.com"), 9090);
        let mut out = Vec::new();
        response.write_to(&mut out).await.unwrap();

        let mut expected = vec![5, 0, 0, 3, 11];
        expected.extend_from_slice(b"example.com");
        expected.extend_from_slice(&[35, 130]);
        assert_eq!(out.len(), 5 + 11 + 2);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_encode_ipv6() {
        let response = Response::new(ReplyType::HostUnreachable, Ipv6Addr::LOCALHOST, 1);
        let mut buf = BytesMut::new();
        response.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), 22);
        assert_eq!(&buf[..4], &[5, 4, 0, 4]);
        assert_eq!(&buf[4..20], &Ipv6Addr::LOCALHOST.octets());
        assert_eq!(&buf[20..], &[0, 1]);
    }

    #[test]
    fn test_failure_reply() {
        let mut buf = BytesMut::new();
        Response::failure(ReplyType::Failed).encode(&mut buf).unwrap();
        assert_eq!(&buf[..], &[5, 1, 0, 1, 127, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_success_uses_bound_family() {
        let bound = SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 50000);
        let response = Response::success(bound, 443);
        assert_eq!(response.address, Address::Ipv6(Ipv6Addr::LOCALHOST));
        assert_eq!(response.port, 443);
    }

    #[tokio::test]
    async fn test_oversized_domain_writes_nothing() {
        let response = Response::new(ReplyType::Success, Address::domain(vec![b'x'; 300]), 80);
        let mut out = Vec::new();
        assert!(response.write_to(&mut out).await.is_err());
        assert!(out.is_empty());
    }
}
