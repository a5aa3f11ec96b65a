//! Interactive question loop.

use crate::mentor::Mentor;
use anyhow::{Context, Result};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

/// Typed at the prompt to leave, in any letter case.
pub const EXIT_KEYWORD: &str = "quit";

const READY: &str = "✅ AI Mentor đã sẵn sàng! Gõ 'quit' để thoát.";
const PROMPT: &str = "Bạn: ";
const FAREWELL: &str = "👋 Tạm biệt!";
const CANCELLING: &str = "⏹ Đang hủy câu hỏi...";

/// Reads questions from `input` and writes answers to `output` until the
/// exit keyword or end of input.
///
/// While a question runs, `interrupt` is awaited alongside it; when it fires
/// the question is cancelled at its next step boundary and the loop goes on.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub async fn run<R, W, I, F>(mentor: &Mentor, input: R, mut output: W, interrupt: I) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    I: Fn() -> F,
    F: Future<Output = ()>,
{
    let mut lines = input.lines();
    write_line(&mut output, READY).await?;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            write_line(&mut output, "").await?;
            break;
        };

        let question = line.trim();
        if question.eq_ignore_ascii_case(EXIT_KEYWORD) {
            break;
        }
        if question.is_empty() {
            continue;
        }

        let message = answer(mentor, question, &interrupt, &mut output).await?;
        write_line(&mut output, &format!("AI Mentor: {message}")).await?;
    }

    write_line(&mut output, FAREWELL).await
}

async fn answer<W, I, F>(mentor: &Mentor, question: &str, interrupt: &I, output: &mut W) -> Result<String>
where
    W: AsyncWrite + Unpin,
    I: Fn() -> F,
    F: Future<Output = ()>,
{
    let mut pending = match mentor.ask(question) {
        Ok(pending) => pending,
        Err(e) => return Ok(format!("Xin lỗi, tôi không thể xử lý câu hỏi này ({e}).")),
    };

    let joined = tokio::select! {
        joined = pending.task_mut() => joined,
        () = interrupt() => {
            info!(id = pending.id(), "Cancelling question");
            write_line(output, CANCELLING).await?;
            pending.cancel();
            pending.wait().await
        }
    };

    match joined {
        Ok(report) => Ok(report.user_message()),
        Err(e) => {
            warn!(error = %e, "Question worker failed");
            Ok(format!("Xin lỗi, đã xảy ra lỗi nội bộ ({e})."))
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
