use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use socks5::{Session, SessionConfig, TcpDialer};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "socks5-server")]
#[command(about = "SOCKS5 proxy server (no authentication, CONNECT only)")]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    listen_addr: String,

    /// Seconds allowed for method negotiation and request parsing
    #[arg(long)]
    handshake_timeout: Option<u64>,

    /// Seconds allowed for connecting to the target
    #[arg(long)]
    connect_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SessionConfig {
        handshake_timeout: args.handshake_timeout.map(Duration::from_secs),
    };
    let dialer = TcpDialer::new(args.connect_timeout.map(Duration::from_secs));

    let listener = TcpListener::bind(&args.listen_addr)
        .await
        .with_context(|| format!("无法监听 {}", args.listen_addr))?;
    info!("SOCKS5 代理服务器启动在 {}", args.listen_addr);

    loop {
        match listener.accept().await {
            Ok((socket, addr)) => {
                let session = Session::new(socket, dialer.clone(), config.clone());
                info!("[{}] 新连接来自: {}", session.id(), addr);

                tokio::spawn(async move {
                    if let Err(e) = session.run().await {
                        error!("处理连接 {} 时出错: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                error!("接受连接时出错: {}", e);
            }
        }
    }
}
