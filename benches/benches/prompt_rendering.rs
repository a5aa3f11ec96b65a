//! Benchmarks for prompt construction.
//!
//! The prompt is rebuilt from the full transcript on every iteration, so its
//! cost grows with the number of steps already taken.

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mentor_sdk::{
    Action, Observation, PromptBuilder, Step, Tool, ToolError, ToolRegistry, Transcript,
};
use std::borrow::Cow;

struct EchoTool(&'static str);

impl Tool for EchoTool {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.0)
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed("Trả lại đầu vào.")
    }

    fn invoke(&self, input: &str) -> Result<String, ToolError> {
        Ok(input.to_string())
    }
}

fn registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for name in [
        "Google_Calendar_Reader",
        "Study_Material_Searcher",
        "Flashcard_Manager",
    ] {
        let _ = registry.register(EchoTool(name));
    }
    registry
}

fn transcript(steps: usize) -> Transcript {
    let mut transcript = Transcript::new();
    for i in 0..steps {
        let _ = transcript.append(Step::action(
            format!("Bước {i}"),
            Action::new("Study_Material_Searcher", "tích phân"),
            Observation::Success("- Tiêu đề: Tích phân\n  Link: https://example.edu\n".repeat(3)),
        ));
    }
    transcript
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("prompt_rendering/render");

    let prompt = PromptBuilder::new();
    let tools = registry();

    for steps in [0usize, 5, 15] {
        let history = transcript(steps);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{steps}_steps")),
            &history,
            |b, h| b.iter(|| prompt.render(black_box("Thủ đô của Việt Nam là gì?"), &tools, h)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
