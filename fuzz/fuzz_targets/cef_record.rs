#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use logsync_cef_syslog::CefRecord;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    class_id: String,
    name: String,
    severity: u8,
    /// 확장 필드 (최대 16개로 제한)
    extensions: Vec<(String, String)>,
}

fuzz_target!(|input: FuzzInput| {
    let has_extensions = !input.extensions.is_empty();
    let mut record = CefRecord::new(input.class_id, input.name, input.severity);
    for (key, value) in input.extensions.into_iter().take(16) {
        record = record.with_extension(key, value);
    }

    let rendered = record.to_string();

    // 레코드는 항상 한 줄
    assert!(!rendered.contains('\n'), "raw newline: {rendered:?}");
    assert!(rendered.starts_with("CEF:0|Swiss Learning Hub AG|LMS|1.0.0|"));

    // 헤더 구분자 6개 (+ 확장 구분자 1개)는 이스케이프로 사라지지 않음
    let expected = if has_extensions { 7 } else { 6 };
    assert!(
        count_unescaped(&rendered, '|') >= expected,
        "header lost a separator: {rendered:?}"
    );
});

/// 백슬래시로 이스케이프되지 않은 `needle` 개수
fn count_unescaped(s: &str, needle: char) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in s.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == needle {
            count += 1;
        }
    }
    count
}
