use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};
use crate::protocol::AddressType;

/// DST.ADDR / BND.ADDR 字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Ipv4(Ipv4Addr),
    /// 域名按原样保存，不校验字符集
    Domain(Bytes),
    Ipv6(Ipv6Addr),
}

impl Address {
    pub fn domain(name: impl Into<Bytes>) -> Self {
        Address::Domain(name.into())
    }

    pub fn address_type(&self) -> AddressType {
        match self {
            Address::Ipv4(_) => AddressType::Ipv4,
            Address::Domain(_) => AddressType::Domain,
            Address::Ipv6(_) => AddressType::Ipv6,
        }
    }

    /// 用于拨号的主机名：IP 字面量或域名
    pub fn host(&self) -> String {
        match self {
            Address::Ipv4(ip) => ip.to_string(),
            Address::Ipv6(ip) => ip.to_string(),
            Address::Domain(name) => String::from_utf8_lossy(name).into_owned(),
        }
    }

    /// 读取 ATYP 之后的地址和端口
    pub(crate) async fn read_with_port<R>(reader: &mut R, atyp: AddressType) -> Result<(Self, u16)>
    where
        R: AsyncRead + Unpin,
    {
        match atyp {
            AddressType::Ipv4 => {
                let mut buf = [0u8; 4 + 2];
                reader.read_exact(&mut buf).await?;
                let ip = Ipv4Addr::new(buf[0], buf[1], buf[2], buf[3]);
                let port = u16::from_be_bytes([buf[4], buf[5]]);
                Ok((Address::Ipv4(ip), port))
            }
            AddressType::Domain => {
                let len = reader.read_u8().await? as usize;
                let mut buf = vec![0u8; len + 2];
                reader.read_exact(&mut buf).await?;
                let port = u16::from_be_bytes([buf[len], buf[len + 1]]);
                buf.truncate(len);
                Ok((Address::Domain(Bytes::from(buf)), port))
            }
            AddressType::Ipv6 => {
                let mut buf = [0u8; 16 + 2];
                reader.read_exact(&mut buf).await?;
                let mut octets = [0u8; 16];
                octets.copy_from_slice(&buf[..16]);
                let port = u16::from_be_bytes([buf[16], buf[17]]);
                Ok((Address::Ipv6(Ipv6Addr::from(octets)), port))
            }
        }
    }

    /// 写入 ATYP、地址和端口
    pub(crate) fn encode_with_port(&self, port: u16, buf: &mut BytesMut) -> Result<()> {
        match self {
            Address::Ipv4(ip) => {
                buf.put_u8(AddressType::Ipv4.into());
                buf.put_slice(&ip.octets());
            }
            Address::Domain(name) => {
                let len = u8::try_from(name.len()).map_err(|_| Error::DomainTooLong(name.len()))?;
                buf.put_u8(AddressType::Domain.into());
                buf.put_u8(len);
                buf.put_slice(name);
            }
            Address::Ipv6(ip) => {
                buf.put_u8(AddressType::Ipv6.into());
                buf.put_slice(&ip.octets());
            }
        }
        buf.put_u16(port);
        Ok(())
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => Address::Ipv4(v4),
            IpAddr::V6(v6) => Address::Ipv6(v6),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Address::Ipv4(ip)
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Self {
        Address::Ipv6(ip)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Ipv4(ip) => write!(f, "{}", ip),
            Address::Ipv6(ip) => write!(f, "[{}]", ip),
            Address::Domain(name) => f.write_str(&String::from_utf8_lossy(name)),
        }
    }
}
