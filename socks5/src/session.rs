use std::time::Duration;

use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use uuid::Uuid;

use crate::dial::Dialer;
use crate::error::{Error, Result};
use crate::protocol::{CommandType, METHOD_NO_ACCEPTABLE, ReplyType};
use crate::relay::{RelayStats, close, relay};
use crate::request::{Request, read_method_selection, select_method, write_method_selection};
use crate::response::Response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    MethodsReceived,
    MethodSelected,
    RequestReceived,
    Dialing,
    Replied,
    Relaying,
    Closed,
    Errored,
}

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// 方法协商加请求解析的总时限，None 表示不限制
    pub handshake_timeout: Option<Duration>,
}

/// 单个客户端连接的处理流程
pub struct Session<S, D> {
    id: Uuid,
    client: BufReader<S>,
    dialer: D,
    config: SessionConfig,
    state: State,
}

impl<S, D> Session<S, D>
where
    S: AsyncRead + AsyncWrite + Unpin,
    D: Dialer,
{
    pub fn new(stream: S, dialer: D, config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            client: BufReader::new(stream),
            dialer,
            config,
            state: State::Start,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 运行到连接结束。出错时客户端连接在返回前关闭
    pub async fn run(mut self) -> Result<RelayStats> {
        let mut target = match self.establish().await {
            Ok(target) => target,
            Err(e) => {
                self.transition(State::Errored);
                close(&mut self.client).await;
                return Err(e);
            }
        };

        self.transition(State::Relaying);
        // 缓冲区里已读未处理的字节随 BufReader 一起进入转发
        let stats = relay(&mut self.client, &mut target).await;
        self.transition(State::Closed);
        info!(
            "[{}] 连接关闭，上行 {} 字节，下行 {} 字节",
            self.id, stats.client_to_target.bytes, stats.target_to_client.bytes
        );
        Ok(stats)
    }

    async fn establish(&mut self) -> Result<D::Stream> {
        let handshake_timeout = self.config.handshake_timeout;
        let request = match handshake_timeout {
            Some(limit) => tokio::time::timeout(limit, self.handshake())
                .await
                .map_err(|_| Error::Timeout)??,
            None => self.handshake().await?,
        };
        self.connect(request).await
    }

    async fn handshake(&mut self) -> Result<Request> {
        let methods = read_method_selection(&mut self.client).await?;
        self.transition(State::MethodsReceived);

        let method = select_method(&methods);
        write_method_selection(&mut self.client, method).await?;
        if method == METHOD_NO_ACCEPTABLE {
            return Err(Error::NoAcceptableMethod);
        }
        self.transition(State::MethodSelected);

        let request = Request::read_from(&mut self.client).await?;
        self.transition(State::RequestReceived);
        info!(
            "[{}] 请求 {} {}:{}",
            self.id, request.command, request.address, request.port
        );
        Ok(request)
    }

    async fn connect(&mut self, request: Request) -> Result<D::Stream> {
        // 只实现 CONNECT
        if request.command != CommandType::Connect {
            self.reply_best_effort(Response::failure(ReplyType::UnsupportedCommand))
                .await;
            return Err(Error::UnsupportedCommand(request.command));
        }

        self.transition(State::Dialing);
        let (host, port) = request.target();
        let (target, local) = match self.dialer.dial(&host, port).await {
            Ok(dialed) => dialed,
            Err(e) => {
                self.reply_best_effort(Response::failure(ReplyType::Failed))
                    .await;
                return Err(Error::Dial {
                    target: format!("{}:{}", request.address, port),
                    source: e,
                });
            }
        };

        Response::success(local, request.port)
            .write_to(&mut self.client)
            .await?;
        self.transition(State::Replied);
        info!("[{}] 已连接目标 {}:{}", self.id, request.address, port);
        Ok(target)
    }

    /// 失败应答只尝试一次，写失败只记日志
    async fn reply_best_effort(&mut self, response: Response) {
        if let Err(e) = response.write_to(&mut self.client).await {
            warn!("[{}] 发送失败应答 {} 出错: {}", self.id, response.reply, e);
        }
    }

    fn transition(&mut self, next: State) {
        debug!("[{}] {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }
}
