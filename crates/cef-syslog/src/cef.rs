//! CEF(Common Event Format) 레코드
//!
//! 형식: `CEF:0|Vendor|Product|Version|SignatureID|Name|Severity|Extension`
//!
//! 인코딩은 실패하지 않습니다. 모든 입력 문자열은 필드 종류에 맞게
//! 한 번의 순회로 이스케이프됩니다.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

/// CEF 포맷 버전
pub const CEF_VERSION: u8 = 0;

/// 기본 장비 제조사
pub const DEVICE_VENDOR: &str = "Swiss Learning Hub AG";

/// 기본 장비 제품명
pub const DEVICE_PRODUCT: &str = "LMS";

/// 기본 장비 버전
pub const DEVICE_VERSION: &str = "1.0.0";

/// 확장 키: 출발지 주소
pub const EXT_SOURCE_ADDRESS: &str = "src";
/// 확장 키: 출발지 사용자 이름
pub const EXT_SOURCE_USER_NAME: &str = "suser";
/// 확장 키: 출발지 사용자 ID
pub const EXT_SOURCE_USER_ID: &str = "suid";
/// 확장 키: 수신 시각 (epoch 밀리초)
pub const EXT_RECEIPT_TIME: &str = "rt";

#[derive(Clone, Copy)]
enum FieldKind {
    Header,
    Extension,
}

fn write_escaped(out: &mut impl fmt::Write, s: &str, kind: FieldKind) -> fmt::Result {
    for ch in s.chars() {
        match (ch, kind) {
            ('\\', _) => out.write_str("\\\\")?,
            ('\n', _) => out.write_str("\\n")?,
            ('|', FieldKind::Header) => out.write_str("\\|")?,
            ('=', FieldKind::Extension) => out.write_str("\\=")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}

fn escape(s: &str, kind: FieldKind) -> String {
    let mut out = String::with_capacity(s.len());
    // String에 대한 fmt::Write는 실패하지 않음
    let _ = write_escaped(&mut out, s, kind);
    out
}

/// 헤더 필드를 이스케이프합니다: `\` → `\\`, `|` → `\|`, 개행 → `\n`
pub fn escape_header(s: &str) -> String {
    escape(s, FieldKind::Header)
}

/// 확장 키/값을 이스케이프합니다: `\` → `\\`, 개행 → `\n`, `=` → `\=`
///
/// 파이프(`|`)는 확장 영역에서 이스케이프하지 않습니다.
pub fn escape_extension(s: &str) -> String {
    escape(s, FieldKind::Extension)
}

/// CEF 확장 필드 (key=value 쌍)
///
/// 키 사전순으로 정렬되어 렌더링 순서가 결정적입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions(BTreeMap<String, String>);

impl Extensions {
    /// 빈 확장 필드를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 값을 설정합니다. 같은 키가 있으면 덮어씁니다.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 키 순서대로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (key, value)) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_char(' ')?;
            }
            write_escaped(f, key, FieldKind::Extension)?;
            f.write_char('=')?;
            write_escaped(f, value, FieldKind::Extension)?;
        }
        Ok(())
    }
}

/// CEF 레코드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CefRecord {
    pub device_vendor: String,
    pub device_product: String,
    pub device_version: String,
    /// Signature ID
    pub class_id: String,
    pub name: String,
    /// 심각도 (0-10)
    pub severity: u8,
    pub extensions: Extensions,
}

impl CefRecord {
    /// 기본 장비 정보로 레코드를 생성합니다.
    pub fn new(class_id: impl Into<String>, name: impl Into<String>, severity: u8) -> Self {
        Self {
            device_vendor: DEVICE_VENDOR.to_owned(),
            device_product: DEVICE_PRODUCT.to_owned(),
            device_version: DEVICE_VERSION.to_owned(),
            class_id: class_id.into(),
            name: name.into(),
            severity,
            extensions: Extensions::new(),
        }
    }

    /// 확장 필드를 추가합니다 (builder 스타일).
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key, value);
        self
    }
}

impl fmt::Display for CefRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CEF:{CEF_VERSION}")?;
        for field in [
            &self.device_vendor,
            &self.device_product,
            &self.device_version,
            &self.class_id,
            &self.name,
        ] {
            f.write_char('|')?;
            write_escaped(f, field, FieldKind::Header)?;
        }
        write!(f, "|{}", self.severity)?;

        if !self.extensions.is_empty() {
            write!(f, "|{}", self.extensions)?;
        }
        Ok(())
    }
}
