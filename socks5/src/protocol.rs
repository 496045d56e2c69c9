use std::fmt;

use crate::error::Error;

// SOCKS5 协议常量
pub const SOCKS_VERSION: u8 = 0x05;
pub const METHOD_NO_AUTH: u8 = 0x00;
pub const METHOD_NO_ACCEPTABLE: u8 = 0xFF;
pub const RESERVED: u8 = 0x00;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandType {
    Connect = 0x01,
    Bind = 0x02,
    UdpAssociate = 0x03,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Connect => "Connect",
            CommandType::Bind => "Bind",
            CommandType::UdpAssociate => "UdpAssociate",
        }
    }

    /// 原始字节的可读名称，未知值返回 "Unknown"
    pub fn name_of(raw: u8) -> &'static str {
        Self::try_from(raw).map_or(UNKNOWN, |c| c.as_str())
    }
}

impl TryFrom<u8> for CommandType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(CommandType::Connect),
            0x02 => Ok(CommandType::Bind),
            0x03 => Ok(CommandType::UdpAssociate),
            other => Err(Error::InvalidCommand(other)),
        }
    }
}

impl From<CommandType> for u8 {
    fn from(value: CommandType) -> Self {
        value as u8
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AddressType {
    Ipv4 = 0x01,
    Domain = 0x03,
    Ipv6 = 0x04,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Ipv4 => "Ipv4",
            AddressType::Domain => "Domain",
            AddressType::Ipv6 => "Ipv6",
        }
    }

    pub fn name_of(raw: u8) -> &'static str {
        Self::try_from(raw).map_or(UNKNOWN, |a| a.as_str())
    }
}

impl TryFrom<u8> for AddressType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(AddressType::Ipv4),
            0x03 => Ok(AddressType::Domain),
            0x04 => Ok(AddressType::Ipv6),
            other => Err(Error::UnsupportedAddressType(other)),
        }
    }
}

impl From<AddressType> for u8 {
    fn from(value: AddressType) -> Self {
        value as u8
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 代理应答中的状态码 (REP 字段)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReplyType {
    Success = 0x00,
    Failed = 0x01,
    NotAllowed = 0x02,
    NetworkUnreachable = 0x03,
    HostUnreachable = 0x04,
    ConnectionRefused = 0x05,
    TtlExpired = 0x06,
    UnsupportedCommand = 0x07,
    UnsupportedAddress = 0x08,
}

impl ReplyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyType::Success => "Success",
            ReplyType::Failed => "Failed",
            ReplyType::NotAllowed => "NotAllowed",
            ReplyType::NetworkUnreachable => "NetworkUnreachable",
            ReplyType::HostUnreachable => "HostUnreachable",
            ReplyType::ConnectionRefused => "ConnectionRefused",
            ReplyType::TtlExpired => "TtlExpired",
            ReplyType::UnsupportedCommand => "UnsupportedCommand",
            ReplyType::UnsupportedAddress => "UnsupportedAddress",
        }
    }

    pub fn name_of(raw: u8) -> &'static str {
        Self::try_from(raw).map_or(UNKNOWN, |r| r.as_str())
    }
}

impl TryFrom<u8> for ReplyType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(ReplyType::Success),
            0x01 => Ok(ReplyType::Failed),
            0x02 => Ok(ReplyType::NotAllowed),
            0x03 => Ok(ReplyType::NetworkUnreachable),
            0x04 => Ok(ReplyType::HostUnreachable),
            0x05 => Ok(ReplyType::ConnectionRefused),
            0x06 => Ok(ReplyType::TtlExpired),
            0x07 => Ok(ReplyType::UnsupportedCommand),
            0x08 => Ok(ReplyType::UnsupportedAddress),
            other => Err(Error::InvalidReply(other)),
        }
    }
}

impl From<ReplyType> for u8 {
    fn from(value: ReplyType) -> Self {
        value as u8
    }
}

impl fmt::Display for ReplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
