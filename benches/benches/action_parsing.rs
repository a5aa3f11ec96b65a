//! Benchmarks for reading model output.
//!
//! Performance-critical paths:
//! - `ActionParser::parse`: marker scanning on every completion
//! - `extract_json_object`: payload recovery from noisy action input
//! - `decode_payload`: extraction plus deserialization

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mentor_sdk::{ActionParser, decode_payload, extract_json_object};
use serde::Deserialize;

const FINAL: &str = "Tôi đã có đủ thông tin.\nFinal Answer: Thủ đô của Việt Nam là Hà Nội.";
const ACTION: &str = "Cần xem lịch.\nAction: Google_Calendar_Reader\nAction Input: 7";
const FENCED_JSON: &str = "Thêm thẻ mới.\nAction: Flashcard_Manager\nAction Input: ```json\n{\"action\": \"add\", \"topic\": \"Hóa học\", \"front\": \"H2O\", \"back\": \"Nước\"}\n```";
const MALFORMED: &str = "Tôi nghĩ câu trả lời là Hà Nội nhưng quên định dạng.";

#[derive(Deserialize)]
#[allow(dead_code)]
struct FlashcardPayload {
    action: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    front: Option<String>,
    #[serde(default)]
    back: Option<String>,
}

fn bench_parse_outputs(c: &mut Criterion) {
    let mut group = c.benchmark_group("action_parsing/parse");

    let inputs = [
        ("final_answer", FINAL),
        ("action", ACTION),
        ("fenced_json", FENCED_JSON),
        ("malformed", MALFORMED),
    ];

    for (name, input) in &inputs {
        group.bench_with_input(BenchmarkId::from_parameter(*name), *input, |b, i| {
            b.iter(|| ActionParser::parse(black_box(i)));
        });
    }

    group.finish();
}

fn bench_parse_long_thought(c: &mut Criterion) {
    let mut group = c.benchmark_group("action_parsing/long_thought");

    for size in [100usize, 1000, 10000] {
        let input = format!(
            "{}\nAction: Study_Material_Searcher\nAction Input: bài giảng tích phân",
            "suy nghĩ ".repeat(size)
        );

        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{size}_words")),
            &input,
            |b, i| b.iter(|| ActionParser::parse(black_box(i))),
        );
    }

    group.finish();
}

fn bench_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("action_parsing/payload");

    let noisy = "Đây là đầu vào: {\"action\": \"get\", \"topic\": \"Sinh học\"} cảm ơn";

    group.bench_function("extract", |b| {
        b.iter(|| extract_json_object(black_box(noisy)));
    });
    group.bench_function("decode", |b| {
        b.iter(|| decode_payload::<FlashcardPayload>(black_box(noisy)));
    });
    group.bench_function("decode_missing", |b| {
        b.iter(|| decode_payload::<FlashcardPayload>(black_box(MALFORMED)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_outputs,
    bench_parse_long_thought,
    bench_payload
);
criterion_main!(benches);
