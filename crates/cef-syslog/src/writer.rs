//! 재연결 syslog 작성기
//!
//! [`SyslogWriter`]는 원격 syslog 수집기와의 세션 하나를 관리합니다.
//!
//! # 상태
//!
//! ```text
//! disconnected ──dial──▶ connected
//!      ▲                    │
//!      └── send/retry 실패 ──┘
//! ```
//!
//! 쓰기 한 번은 하나의 잠금 안에서 다음 순서로 진행됩니다:
//! 1. 연결되어 있으면 전송, 성공 시 반환
//! 2. 실패했거나 연결이 없으면 기존 연결을 닫고(에러 무시) 한 번 다시 연결
//! 3. 한 번 재전송, 실패 시 연결을 버리고 에러 반환
//!
//! 재시도 루프나 백오프는 없습니다. `close()` 이후의 쓰기는 다시 연결합니다.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use logsync_core::error::LogsyncError;
use logsync_core::metrics as m;
use logsync_core::pipeline::RecordSink;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::dialer::{Connection, Dialer, NetDialer, Network};
use crate::error::CefSyslogError;
use crate::priority::{Priority, Severity};

/// 기본 태그 (프로그램 이름을 알 수 없을 때)
const FALLBACK_TAG: &str = "logsync";

/// 세션 생성 옵션
#[derive(Debug, Clone)]
pub struct WriterOptions {
    pub network: Network,
    /// 원격 주소 (host:port)
    pub address: String,
    /// facility 비트는 생성 시점에 고정됩니다.
    pub priority: Priority,
    /// 비어 있으면 프로그램 이름
    pub tag: String,
    /// 없으면 로컬 호스트 이름, 그것도 없으면 연결의 로컬 주소
    pub hostname: Option<String>,
}

impl WriterOptions {
    pub fn new(network: Network, address: impl Into<String>, priority: Priority) -> Self {
        Self {
            network,
            address: address.into(),
            priority,
            tag: String::new(),
            hostname: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }
}

/// 잠금으로 보호되는 세션 상태
struct Session<C> {
    conn: Option<C>,
    hostname: String,
}

/// 원격 syslog 수집기 세션
pub struct SyslogWriter<D: Dialer = NetDialer> {
    dialer: D,
    network: Network,
    address: String,
    priority: Priority,
    tag: String,
    pid: u32,
    session: Mutex<Session<D::Conn>>,
}

impl SyslogWriter<NetDialer> {
    /// TCP/UDP 소켓으로 수집기에 연결합니다.
    pub async fn connect(options: WriterOptions) -> Result<Self, CefSyslogError> {
        Self::dial(options, NetDialer).await
    }
}

impl<D: Dialer> SyslogWriter<D> {
    /// 세션을 만들고 즉시 연결합니다. 연결 실패는 에러입니다.
    pub async fn dial(options: WriterOptions, dialer: D) -> Result<Self, CefSyslogError> {
        let writer = Self::new(options, dialer);
        {
            let mut guard = writer.session.lock().await;
            writer.reconnect(&mut guard).await?;
        }
        info!(
            network = %writer.network,
            addr = %writer.address,
            "connected to syslog collector"
        );
        Ok(writer)
    }

    /// 연결하지 않은 상태로 세션을 만듭니다. 첫 쓰기에서 연결합니다.
    pub fn new(options: WriterOptions, dialer: D) -> Self {
        let tag = if options.tag.is_empty() {
            program_name()
        } else {
            options.tag
        };
        let hostname = options
            .hostname
            .filter(|h| !h.is_empty())
            .or_else(local_hostname)
            .unwrap_or_default();

        Self {
            dialer,
            network: options.network,
            address: options.address,
            priority: options.priority,
            tag,
            pid: std::process::id(),
            session: Mutex::new(Session {
                conn: None,
                hostname,
            }),
        }
    }

    /// 현재 시각으로 메시지를 전송합니다. 성공 시 메시지 길이를 반환합니다.
    pub async fn write(&self, severity: Severity, message: &str) -> Result<usize, CefSyslogError> {
        self.write_at(Utc::now(), severity, message).await
    }

    /// 주어진 시각으로 메시지를 전송합니다. 성공 시 메시지 길이를 반환합니다.
    pub async fn write_at(
        &self,
        stamp: DateTime<Utc>,
        severity: Severity,
        message: &str,
    ) -> Result<usize, CefSyslogError> {
        let priority = self.priority.with_severity(severity);
        let mut guard = self.session.lock().await;
        let session = &mut *guard;

        if let Some(conn) = session.conn.as_mut() {
            let frame = self.envelope(stamp, priority, &session.hostname, message);
            match conn.send(frame.as_bytes()).await {
                Ok(()) => return Ok(message.len()),
                Err(e) => debug!(
                    addr = %self.address,
                    error = %e,
                    "syslog send failed, reconnecting"
                ),
            }
        }

        metrics::counter!(m::TRANSPORT_RECONNECTS_TOTAL, m::LABEL_NETWORK => self.network.as_str())
            .increment(1);
        self.reconnect(session).await?;

        let frame = self.envelope(stamp, priority, &session.hostname, message);
        let result = match session.conn.as_mut() {
            Some(conn) => conn.send(frame.as_bytes()).await,
            None => Err(std::io::Error::from(std::io::ErrorKind::NotConnected)),
        };

        match result {
            Ok(()) => Ok(message.len()),
            Err(source) => {
                warn!(addr = %self.address, error = %source, "syslog retry failed");
                if let Some(mut conn) = session.conn.take() {
                    let _ = conn.close().await;
                }
                Err(CefSyslogError::Write {
                    addr: self.address.clone(),
                    source,
                })
            }
        }
    }

    /// 연결을 닫습니다. 여러 번 호출해도 안전합니다.
    pub async fn close(&self) -> Result<(), CefSyslogError> {
        let mut session = self.session.lock().await;
        match session.conn.take() {
            Some(mut conn) => conn.close().await.map_err(|source| CefSyslogError::Write {
                addr: self.address.clone(),
                source,
            }),
            None => Ok(()),
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.session.lock().await.conn.is_some()
    }

    /// envelope에 기록되는 호스트 이름
    pub async fn hostname(&self) -> String {
        self.session.lock().await.hostname.clone()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// 기존 연결을 닫고(에러 무시) 한 번 다시 연결합니다. 잠금을 잡은 상태에서 호출해야 합니다.
    async fn reconnect(&self, session: &mut Session<D::Conn>) -> Result<(), CefSyslogError> {
        if let Some(mut stale) = session.conn.take() {
            let _ = stale.close().await;
        }

        let conn = self
            .dialer
            .dial(self.network, &self.address)
            .await
            .map_err(|source| CefSyslogError::Dial {
                network: self.network.to_string(),
                addr: self.address.clone(),
                source,
            })?;

        if session.hostname.is_empty()
            && let Some(local) = conn.local_addr()
        {
            session.hostname = local.to_string();
        }
        session.conn = Some(conn);
        Ok(())
    }

    /// `<PRI>RFC3339 hostname tag[pid]: message\n`
    fn envelope(
        &self,
        stamp: DateTime<Utc>,
        priority: Priority,
        hostname: &str,
        message: &str,
    ) -> String {
        let nl = if message.ends_with('\n') { "" } else { "\n" };
        format!(
            "<{}>{} {} {}[{}]: {}{}",
            priority,
            stamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            hostname,
            self.tag,
            self.pid,
            message,
            nl
        )
    }
}

impl<D: Dialer> RecordSink for SyslogWriter<D> {
    fn name(&self) -> &str {
        "syslog"
    }

    async fn deliver(
        &self,
        stamp: DateTime<Utc>,
        severity: u8,
        record: &str,
    ) -> Result<(), LogsyncError> {
        self.write_at(stamp, Severity::from_masked(severity), record)
            .await
            .map(|_| ())
            .map_err(LogsyncError::from)
    }
}

fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map_or_else(|| FALLBACK_TAG.to_owned(), str::to_owned)
}

fn local_hostname() -> Option<String> {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
}
