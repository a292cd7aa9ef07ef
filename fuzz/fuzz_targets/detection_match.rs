#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use logsync_core::config::{DetectionConfig, ReporterConfig};
use logsync_core::types::Event;
use logsync_detection::Detection;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 리포터 목록 (최대 8개로 제한)
    reporters: Vec<FuzzReporter>,
    event_type: Option<String>,
    user_id: Option<String>,
    ip_address: Option<String>,
    details: Vec<(String, String)>,
    time: i64,
}

#[derive(Arbitrary, Debug)]
struct FuzzReporter {
    kind: FuzzKind,
    value: String,
}

#[derive(Arbitrary, Debug)]
enum FuzzKind {
    Type,
    DetailExists,
    DetailNotExists,
    Other(String),
}

impl FuzzReporter {
    fn to_config(&self) -> ReporterConfig {
        let (kind, key) = match &self.kind {
            FuzzKind::Type => ("type".to_owned(), "type"),
            FuzzKind::DetailExists => ("detail_exists".to_owned(), "details"),
            FuzzKind::DetailNotExists => ("detail_not_exists".to_owned(), "details"),
            FuzzKind::Other(kind) => (kind.clone(), "value"),
        };
        ReporterConfig {
            kind,
            config: HashMap::from([(key.to_owned(), self.value.clone())]),
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let config = DetectionConfig {
        class_id: "fuzz".to_owned(),
        name: "Fuzz Detection".to_owned(),
        severity: 5,
        loglevel: 6,
        reporters: input.reporters.iter().take(8).map(FuzzReporter::to_config).collect(),
    };
    let detection = Detection::compile(&config);

    let event = Event {
        time: input.time,
        kind: input.event_type,
        user_id: input.user_id,
        ip_address: input.ip_address,
        details: input.details.into_iter().collect(),
        ..Default::default()
    };

    let matched = detection.matches(&event);
    if detection.reporters().is_empty() {
        assert!(!matched, "empty detection must never match");
    }
    if detection.reporters().iter().any(|r| !r.is_supported()) {
        assert!(!matched, "unsupported reporter must never match");
    }

    // 렌더링은 실패하지 않으며 항상 한 줄
    let record = detection.render(&event);
    assert!(!record.contains('\n'));
});
