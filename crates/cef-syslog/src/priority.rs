//! syslog priority 타입
//!
//! PRI 값은 `facility | severity`이며, facility는 8의 배수, severity는 0-7입니다.
//! 최댓값은 `Local7 | Debug` = 191입니다.

use std::fmt;

use crate::error::CefSyslogError;

/// severity 비트 마스크
pub const SEVERITY_MASK: u8 = 0x07;

/// facility 비트 마스크
pub const FACILITY_MASK: u8 = 0xf8;

/// 허용되는 최대 priority 값
pub const MAX_PRIORITY: u8 = Facility::Local7 as u8 | Severity::Debug as u8;

/// syslog severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Emerg = 0,
    Alert = 1,
    Crit = 2,
    Err = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl Severity {
    /// 하위 3비트만 사용하여 severity를 만듭니다. 실패하지 않습니다.
    pub fn from_masked(value: u8) -> Self {
        match value & SEVERITY_MASK {
            0 => Self::Emerg,
            1 => Self::Alert,
            2 => Self::Crit,
            3 => Self::Err,
            4 => Self::Warning,
            5 => Self::Notice,
            6 => Self::Info,
            _ => Self::Debug,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emerg => "emerg",
            Self::Alert => "alert",
            Self::Crit => "crit",
            Self::Err => "err",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = CefSyslogError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > SEVERITY_MASK {
            return Err(CefSyslogError::InvalidPriority(value));
        }
        Ok(Self::from_masked(value))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// syslog facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Facility {
    Kern = 0,
    User = 8,
    Mail = 16,
    Daemon = 24,
    Auth = 32,
    Syslog = 40,
    Lpr = 48,
    News = 56,
    Uucp = 64,
    Cron = 72,
    AuthPriv = 80,
    Ftp = 88,
    Local0 = 128,
    Local1 = 136,
    Local2 = 144,
    Local3 = 152,
    Local4 = 160,
    Local5 = 168,
    Local6 = 176,
    Local7 = 184,
}

impl TryFrom<u8> for Facility {
    type Error = CefSyslogError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let facility = match value {
            0 => Self::Kern,
            8 => Self::User,
            16 => Self::Mail,
            24 => Self::Daemon,
            32 => Self::Auth,
            40 => Self::Syslog,
            48 => Self::Lpr,
            56 => Self::News,
            64 => Self::Uucp,
            72 => Self::Cron,
            80 => Self::AuthPriv,
            88 => Self::Ftp,
            128 => Self::Local0,
            136 => Self::Local1,
            144 => Self::Local2,
            152 => Self::Local3,
            160 => Self::Local4,
            168 => Self::Local5,
            176 => Self::Local6,
            184 => Self::Local7,
            other => return Err(CefSyslogError::InvalidPriority(other)),
        };
        Ok(facility)
    }
}

/// syslog priority (PRI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Priority(u8);

impl Priority {
    pub fn new(facility: Facility, severity: Severity) -> Self {
        Self(facility as u8 | severity as u8)
    }

    /// 원시 값에서 priority를 만듭니다. 191을 넘으면 에러입니다.
    pub fn from_raw(value: u8) -> Result<Self, CefSyslogError> {
        if value > MAX_PRIORITY {
            return Err(CefSyslogError::InvalidPriority(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn facility_bits(self) -> u8 {
        self.0 & FACILITY_MASK
    }

    pub fn severity(self) -> Severity {
        Severity::from_masked(self.0)
    }

    /// facility 비트는 유지하고 severity만 교체합니다.
    pub fn with_severity(self, severity: Severity) -> Self {
        Self((self.0 & FACILITY_MASK) | (severity as u8 & SEVERITY_MASK))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
