use std::io;
use std::sync::Arc;

use fantasmas::formatter::{get_tick_count, increment_tick, tick_label, CustomFormatter};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use tracing::{info, info_span, warn};
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture(ansi: bool, body: impl FnOnce()) -> String {
    let writer = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(ansi)
        .event_format(CustomFormatter)
        .with_writer(writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, body);
    writer.contents()
}

#[test]
fn test_tick_label_is_four_hex_digits() {
    assert_eq!(tick_label(0), "0x0000");
    assert_eq!(tick_label(42), "0x002A");
    assert_eq!(tick_label(0xBEEF), "0xBEEF");
}

#[test]
fn test_tick_label_wraps_at_sixteen_bits() {
    assert_eq!(tick_label(0x1_0000), "0x0000");
    assert_eq!(tick_label(0x12_3456), "0x3456");
}

#[test]
fn test_tick_counter_only_grows() {
    let before = get_tick_count();
    increment_tick();
    increment_tick();
    assert_that(&get_tick_count()).is_greater_than_or_equal_to(before + 2);
}

#[test]
fn test_plain_line_layout() {
    let output = capture(false, || info!(score = 7, "Ghost caught"));

    let line = output.lines().next().unwrap_or_default();
    let columns: Vec<&str> = line.split_whitespace().collect();
    assert_that(&columns.len()).is_greater_than_or_equal_to(4);
    // hh:mm:ss.ffff
    assert_that(&columns[0].len()).is_equal_to(13);
    assert_that(&columns[1].starts_with("0x")).is_true();
    assert_eq!(columns[2], "INFO");
    assert_that(&line).contains("formatting: Ghost caught score=7");
    assert_that(&line.contains('\u{1b}')).is_false();
}

#[test]
fn test_spans_are_listed_before_target() {
    let output = capture(false, || {
        let span = info_span!("tick", n = 3);
        let _guard = span.enter();
        warn!("Audio request failed");
    });

    assert_that(&output.as_str()).contains(" WARN tick{n=3}: formatting: Audio request failed");
}

#[test]
fn test_ansi_output_is_coloured() {
    let output = capture(true, || info!("Game started"));

    assert_that(&output.as_str()).contains("\u{1b}[32m INFO\u{1b}[0m");
    assert_that(&output.as_str()).contains("Game started");
}
