#![no_main]

use libfuzzer_sys::fuzz_target;

use logsync_core::config::LogsyncConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // 파싱/검증 실패는 에러로만 나타나야 함
        if let Ok(config) = LogsyncConfig::parse_json(content) {
            let _ = config.validate();
        }
    }
});
