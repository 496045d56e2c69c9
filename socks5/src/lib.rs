//! SOCKS5 服务端核心：方法协商、请求解析、应答编码、会话状态机和双向转发。
//!
//! 监听和进程启动由调用方负责，这里只处理一条已接受的连接。

mod address;
mod dial;
mod error;
mod protocol;
mod relay;
mod request;
mod response;
mod session;

pub use address::Address;
pub use dial::{Dialer, TcpDialer};
pub use error::{Error, Result};
pub use protocol::{
    AddressType, CommandType, METHOD_NO_ACCEPTABLE, METHOD_NO_AUTH, ReplyType, SOCKS_VERSION,
};
pub use relay::{RelayStats, Transfer, close, relay};
pub use request::{Request, read_method_selection, select_method, write_method_selection};
pub use response::Response;
pub use session::{Session, SessionConfig, State};
