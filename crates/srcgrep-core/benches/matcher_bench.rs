use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use srcgrep_core::Matcher;

fn bench_case_sensitive(c: &mut Criterion) {
    let matcher = Matcher::case_sensitive(b"needle");
    let line = "some text without the term repeated a lot ".repeat(20) + "needle at the end";

    c.bench_function("case_sensitive_single_hit", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            matcher.find_spans(black_box(line.as_bytes()), &mut out);
            out
        });
    });
}

fn bench_case_insensitive(c: &mut Criterion) {
    let matcher = Matcher::case_insensitive(b"needle");
    let line = "NEEDLE needle NeEdLe ".repeat(10);

    c.bench_function("case_insensitive_many_hits", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            matcher.find_spans(black_box(line.as_bytes()), &mut out);
            out
        });
    });
}

fn bench_regex(c: &mut Criterion) {
    let matcher = Matcher::regex(r"\w+\(\)").unwrap();
    let line = "int main() { return helper(); }".repeat(5);

    c.bench_function("regex_function_calls", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            matcher.find_spans(black_box(line.as_bytes()), &mut out);
            out
        });
    });
}

fn bench_line_lengths(c: &mut Criterion) {
    let matcher = Matcher::case_sensitive(b"target");
    let mut group = c.benchmark_group("line_lengths");

    for len in [64usize, 512, 4096] {
        let mut line = "x".repeat(len);
        line.push_str("target");
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_with_input(BenchmarkId::new("case_sensitive", len), &line, |b, line| {
            b.iter(|| {
                let mut out = Vec::new();
                matcher.find_spans(black_box(line.as_bytes()), &mut out);
                out
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_case_sensitive,
    bench_case_insensitive,
    bench_regex,
    bench_line_lengths,
);
criterion_main!(benches);
