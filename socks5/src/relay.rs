use std::io;

use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const BUFFER_SIZE: usize = 8192;

/// 单个方向的转发结果
#[derive(Debug, Default)]
pub struct Transfer {
    pub bytes: u64,
    pub error: Option<io::Error>,
}

#[derive(Debug, Default)]
pub struct RelayStats {
    pub client_to_target: Transfer,
    pub target_to_client: Transfer,
}

impl RelayStats {
    pub fn total_bytes(&self) -> u64 {
        self.client_to_target.bytes + self.target_to_client.bytes
    }
}

/// 双向转发，两个方向都结束后返回；返回前两端连接都已关闭
pub async fn relay<A, B>(client: A, target: B) -> RelayStats
where
    A: AsyncRead + AsyncWrite + Unpin,
    B: AsyncRead + AsyncWrite + Unpin,
{
    let (mut client_read, mut client_write) = tokio::io::split(client);
    let (mut target_read, mut target_write) = tokio::io::split(target);

    let (client_to_target, target_to_client) = tokio::join!(
        pump(&mut client_read, &mut target_write, "client -> target"),
        pump(&mut target_read, &mut client_write, "target -> client"),
    );

    close(client_read.unsplit(client_write)).await;
    close(target_read.unsplit(target_write)).await;

    RelayStats {
        client_to_target,
        target_to_client,
    }
}

/// 复制到源端 EOF 或出错为止，然后关闭目标写端，让对端读到 EOF
async fn pump<R, W>(reader: &mut R, writer: &mut W, direction: &str) -> Transfer
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut transfer = Transfer::default();
    let mut buf = vec![0u8; BUFFER_SIZE];
    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                transfer.error = Some(e);
                break;
            }
        };
        if let Err(e) = writer.write_all(&buf[..n]).await {
            transfer.error = Some(e);
            break;
        }
        transfer.bytes += n as u64;
    }

    if let Some(e) = &transfer.error {
        warn!("{} 转发出错: {}", direction, e);
    }
    // 半关闭
    if let Err(e) = writer.shutdown().await {
        debug!("{} 关闭写端失败: {}", direction, e);
    }
    debug!("{} 转发完成，共 {} 字节", direction, transfer.bytes);
    transfer
}

/// 关闭连接；已关闭的连接再次关闭不报错
pub async fn close<S>(mut stream: S)
where
    S: AsyncWrite + Unpin,
{
    if let Err(e) = stream.shutdown().await {
        debug!("关闭连接: {}", e);
    }
}
