//! Custom tracing formatter with tick counter integration.
//!
//! Every line carries the wall-clock time and the number of game ticks run so far,
//! so events from the same frame can be grouped when reading a trace.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use time::macros::format_description;
use time::{format_description::FormatItem, OffsetDateTime};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Ticks run since startup.
static TICK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Only the low 16 bits are shown.
const TICK_DISPLAY_MASK: u64 = 0xFFFF;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:4]");

#[derive(Clone, Copy)]
enum Style {
    Dim,
    Bold,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Dim => "\x1b[2m",
            Style::Bold => "\x1b[1m",
        }
    }
}

/// Formats events as `time tick LEVEL spans: target: fields`.
pub struct CustomFormatter;

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();

        let timestamp = OffsetDateTime::now_utc().format(&TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        write_styled(&mut writer, Style::Dim, timestamp)?;
        writer.write_char(' ')?;

        write_styled(&mut writer, Style::Dim, tick_label(get_tick_count()))?;
        writer.write_char(' ')?;

        let (color, label) = level_label(meta.level());
        if writer.has_ansi_escapes() {
            write!(writer, "{color}{label}\x1b[0m ")?;
        } else {
            write!(writer, "{label} ")?;
        }

        if let Some(scope) = ctx.event_scope() {
            let mut any = false;
            for span in scope.from_root() {
                any = true;
                write_styled(&mut writer, Style::Bold, span.metadata().name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>().filter(|f| !f.is_empty()) {
                    write_styled(&mut writer, Style::Bold, "{")?;
                    write!(writer, "{fields}")?;
                    write_styled(&mut writer, Style::Bold, "}")?;
                }
                write_styled(&mut writer, Style::Dim, ":")?;
            }
            if any {
                writer.write_char(' ')?;
            }
        }

        write_styled(&mut writer, Style::Dim, format_args!("{}:", meta.target()))?;
        writer.write_char(' ')?;

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// The tick column, e.g. `0x002A`.
pub fn tick_label(tick: u64) -> String {
    format!("0x{:04X}", tick & TICK_DISPLAY_MASK)
}

/// ANSI colour and five-character, right-aligned label for a level.
fn level_label(level: &Level) -> (&'static str, &'static str) {
    match *level {
        Level::TRACE => ("\x1b[35m", "TRACE"),
        Level::DEBUG => ("\x1b[34m", "DEBUG"),
        Level::INFO => ("\x1b[32m", " INFO"),
        Level::WARN => ("\x1b[33m", " WARN"),
        Level::ERROR => ("\x1b[31m", "ERROR"),
    }
}

fn write_styled(writer: &mut Writer<'_>, style: Style, s: impl fmt::Display) -> fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "{}{}\x1b[0m", style.code(), s)
    } else {
        write!(writer, "{s}")
    }
}

/// Counts one game tick. Called once at the end of every `Game::tick`.
pub fn increment_tick() {
    TICK_COUNTER.fetch_add(1, Ordering::Relaxed);
}

pub fn get_tick_count() -> u64 {
    TICK_COUNTER.load(Ordering::Relaxed)
}
