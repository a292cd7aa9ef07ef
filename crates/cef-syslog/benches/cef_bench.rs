//! CEF 인코딩 벤치마크
//!
//! 확장 필드 수와 이스케이프 대상 문자 비율에 따른 렌더링 비용을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use logsync_cef_syslog::{CefRecord, escape_extension, escape_header};

fn record_with_extensions(count: usize) -> CefRecord {
    let mut record = CefRecord::new("100", "Login", 5);
    for i in 0..count {
        record
            .extensions
            .insert(format!("cs{i}"), format!("value-{i}"));
    }
    record
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("cef_render");
    for count in [0usize, 4, 16, 64] {
        let record = record_with_extensions(count);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(count), &record, |b, record| {
            b.iter(|| black_box(record.to_string()));
        });
    }
    group.finish();
}

fn bench_escape(c: &mut Criterion) {
    let plain = "alice@example.com logged in from 10.0.0.1".repeat(8);
    let noisy = "a|b\\c=d\n".repeat(40);

    let mut group = c.benchmark_group("cef_escape");
    group.bench_function("header_plain", |b| b.iter(|| escape_header(black_box(&plain))));
    group.bench_function("header_noisy", |b| b.iter(|| escape_header(black_box(&noisy))));
    group.bench_function("extension_noisy", |b| {
        b.iter(|| escape_extension(black_box(&noisy)))
    });
    group.finish();
}

criterion_group!(benches, bench_render, bench_escape);
criterion_main!(benches);
