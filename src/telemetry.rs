use prometheus::{register_counter_vec, register_int_counter};
use prometheus::{CounterVec, IntCounter};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

use crate::config::LoggingSettings;

lazy_static! {
    pub static ref QUESTIONS_CREATED: IntCounter = register_int_counter!(
        "trivia_questions_created_total",
        "Number of questions created through the API"
    )
    .unwrap();
    pub static ref QUESTIONS_DELETED: IntCounter = register_int_counter!(
        "trivia_questions_deleted_total",
        "Number of questions deleted through the API"
    )
    .unwrap();
    pub static ref QUIZ_QUESTIONS_SERVED: CounterVec = register_counter_vec!(
        "trivia_quiz_questions_served_total",
        "Number of questions handed out by the quiz endpoint",
        &["category"]
    )
    .unwrap();
}

/// `LOG_LEVEL` wins over the configured directive; a directive that does not
/// parse falls back to `info`.
pub fn init_tracing(settings: &LoggingSettings) {
    let span_events = std::env::var("INCLUDE_SPAN_EVENTS")
        .is_ok_and(|value| value.eq_ignore_ascii_case("true"));
    let fmt_layer = fmt::layer().with_span_events(if span_events {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    });

    tracing_subscriber::registry()
        .with(log_filter(&settings.level))
        .with(fmt_layer)
        .init();
}

fn log_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Registers the counters up front so `/metrics` lists them before first use.
pub fn register_metrics() {
    lazy_static::initialize(&QUESTIONS_CREATED);
    lazy_static::initialize(&QUESTIONS_DELETED);
    lazy_static::initialize(&QUIZ_QUESTIONS_SERVED);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_directive_is_used() {
        if std::env::var("LOG_LEVEL").is_ok() {
            return;
        }
        assert_eq!(log_filter("trivia_api=debug").to_string(), "trivia_api=debug");
        assert_eq!(log_filter("trivia_api=loud").to_string(), "info");
    }
}
