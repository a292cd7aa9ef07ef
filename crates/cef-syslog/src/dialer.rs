//! 연결 추상화 -- dialer trait
//!
//! [`Dialer`]는 네트워크 종류와 주소로 [`Connection`]을 엽니다.
//! 운영 코드는 [`NetDialer`]를, 테스트는 mock dialer를 사용합니다.
//!
//! ```text
//!   SyslogWriter
//!        │
//!        ▼
//!   ┌─────────┐
//!   │ Dialer  │ (trait)
//!   └─────────┘
//!     │     │
//!     ▼     ▼
//!  NetDialer  Mock
//!   │     │
//!  TCP   UDP
//! ```

use std::fmt;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::str::FromStr;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, UdpSocket};

use crate::error::CefSyslogError;

/// 전송 네트워크 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Tcp,
    Udp,
}

impl Network {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

impl FromStr for Network {
    type Err = CefSyslogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            other => Err(CefSyslogError::UnsupportedNetwork(other.to_owned())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 열린 연결 하나
pub trait Connection: Send + 'static {
    /// 프레임 하나를 전송합니다. 부분 전송은 실패로 취급합니다.
    fn send(&mut self, frame: &[u8]) -> impl Future<Output = io::Result<()>> + Send;

    /// 연결을 닫습니다.
    fn close(&mut self) -> impl Future<Output = io::Result<()>> + Send;

    /// 로컬 주소 (호스트 이름을 알 수 없을 때 envelope에 사용)
    fn local_addr(&self) -> Option<SocketAddr>;
}

/// 연결 생성기
pub trait Dialer: Send + Sync + 'static {
    /// 생성되는 연결 타입
    type Conn: Connection;

    /// 원격 주소로 연결합니다.
    fn dial(
        &self,
        network: Network,
        addr: &str,
    ) -> impl Future<Output = io::Result<Self::Conn>> + Send;
}

/// tokio 소켓 기반 dialer
#[derive(Debug, Clone, Copy, Default)]
pub struct NetDialer;

impl Dialer for NetDialer {
    type Conn = NetConnection;

    async fn dial(&self, network: Network, addr: &str) -> io::Result<NetConnection> {
        match network {
            Network::Tcp => {
                let stream = TcpStream::connect(addr).await?;
                stream.set_nodelay(true)?;
                Ok(NetConnection::Tcp(stream))
            }
            Network::Udp => {
                let remote = tokio::net::lookup_host(addr).await?.next().ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::AddrNotAvailable,
                        format!("no address resolved for {addr}"),
                    )
                })?;
                let bind: SocketAddr = if remote.is_ipv4() {
                    ([0, 0, 0, 0], 0).into()
                } else {
                    ([0u16; 8], 0).into()
                };
                let socket = UdpSocket::bind(bind).await?;
                socket.connect(remote).await?;
                Ok(NetConnection::Udp(socket))
            }
        }
    }
}

/// TCP 스트림 또는 연결된 UDP 소켓
#[derive(Debug)]
pub enum NetConnection {
    Tcp(TcpStream),
    /// envelope 하나당 datagram 하나
    Udp(UdpSocket),
}

impl Connection for NetConnection {
    async fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => {
                stream.write_all(frame).await?;
                stream.flush().await
            }
            Self::Udp(socket) => {
                let sent = socket.send(frame).await?;
                if sent != frame.len() {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!("short datagram: {sent} of {} bytes", frame.len()),
                    ));
                }
                Ok(())
            }
        }
    }

    async fn close(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.shutdown().await,
            Self::Udp(_) => Ok(()),
        }
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        match self {
            Self::Tcp(stream) => stream.local_addr().ok(),
            Self::Udp(socket) => socket.local_addr().ok(),
        }
    }
}
