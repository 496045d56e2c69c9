use bytes::{BufMut, BytesMut};
use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::address::Address;
use crate::error::{Error, Result};
use crate::protocol::{
    AddressType, CommandType, METHOD_NO_ACCEPTABLE, METHOD_NO_AUTH, RESERVED, SOCKS_VERSION,
};

/// 客户端发来的代理请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: CommandType,
    pub address: Address,
    pub port: u16,
}

/// 读取方法协商报文，原样返回客户端提供的方法列表
pub async fn read_method_selection<R>(reader: &mut R) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf).await?;

    let version = buf[0];
    let nmethods = buf[1];

    if version != SOCKS_VERSION {
        return Err(Error::VersionMismatch(version));
    }
    // 声称提供认证方法却一个都没有
    if nmethods == 0 {
        return Err(Error::NoMethodsOffered);
    }

    let mut methods = vec![0u8; nmethods as usize];
    reader.read_exact(&mut methods).await?;
    debug!("客户端提供的认证方法: {:?}", methods);
    Ok(methods)
}

/// 只接受无认证方法
pub fn select_method(methods: &[u8]) -> u8 {
    if methods.contains(&METHOD_NO_AUTH) {
        METHOD_NO_AUTH
    } else {
        METHOD_NO_ACCEPTABLE
    }
}

pub async fn write_method_selection<W>(writer: &mut W, method: u8) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&[SOCKS_VERSION, method]).await?;
    writer.flush().await?;
    Ok(())
}

impl Request {
    pub fn new(command: CommandType, address: impl Into<Address>, port: u16) -> Self {
        Self {
            command,
            address: address.into(),
            port,
        }
    }

    pub fn address_type(&self) -> AddressType {
        self.address.address_type()
    }

    /// 拨号目标 (host, port)
    pub fn target(&self) -> (String, u16) {
        (self.address.host(), self.port)
    }

    pub async fn read_from<R>(reader: &mut R) -> Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf).await?;

        let version = buf[0];
        let _reserved = buf[2];

        if version != SOCKS_VERSION {
            return Err(Error::VersionMismatch(version));
        }
        let command = CommandType::try_from(buf[1])?;
        let atyp = AddressType::try_from(buf[3])?;

        let (address, port) = Address::read_with_port(reader, atyp).await?;
        Ok(Self {
            command,
            address,
            port,
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(SOCKS_VERSION);
        buf.put_u8(self.command.into());
        buf.put_u8(RESERVED);
        self.address.encode_with_port(self.port, buf)
    }
}
