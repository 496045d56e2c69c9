use std::io;

use thiserror::Error;

use crate::protocol::CommandType;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// 底层读写失败或对端提前关闭
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("unsupported socks version: {0}")]
    VersionMismatch(u8),

    #[error("no authentication methods offered")]
    NoMethodsOffered,

    #[error("no acceptable authentication method")]
    NoAcceptableMethod,

    #[error("invalid command: {0}")]
    InvalidCommand(u8),

    #[error("invalid or unsupported address type: {0}")]
    UnsupportedAddressType(u8),

    #[error("invalid reply code: {0}")]
    InvalidReply(u8),

    #[error("domain name too long: {0} bytes")]
    DomainTooLong(usize),

    #[error("command not supported: {0}")]
    UnsupportedCommand(CommandType),

    #[error("failed to dial {target}: {source}")]
    Dial {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("handshake timed out")]
    Timeout,
}

impl Error {
    /// 是否为传输层错误（连接中断、短读等），而不是协议内容错误
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
