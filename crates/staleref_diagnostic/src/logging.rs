//! Tracing initialization for staleref.
//!
//! Controlled by environment variables:
//! - `STALEREF_LOG`: filter string (`RUST_LOG` syntax). Falls back to `RUST_LOG`.
//! - `STALEREF_LOG_TREE`: set to any value to enable hierarchical tree output.
//!
//! When neither `STALEREF_LOG` nor `RUST_LOG` is set, defaults to `warn`.
//!
//! Error-and-above events (use-after-free findings logged at
//! [`tracing::error!`]) are additionally appended to `detector.log`,
//! independent of the stderr filter, satisfying spec.md §6's two-destination
//! sink.

use std::fs::OpenOptions;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{prelude::*, registry::LookupSpan, EnvFilter, Layer, Registry};

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize the tracing subscriber. Safe to call more than once — only the
/// first call takes effect.
pub fn init() {
    INIT.get_or_init(|| {
        let stderr_filter = EnvFilter::try_from_env("STALEREF_LOG")
            .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let use_tree = std::env::var("STALEREF_LOG_TREE").is_ok();

        if use_tree {
            Registry::default()
                .with(detector_log_layer())
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_indent_lines(true)
                        .with_deferred_spans(true)
                        .with_bracketed_fields(true)
                        .with_writer(std::io::stderr)
                        .with_filter(stderr_filter),
                )
                .init();
        } else {
            Registry::default()
                .with(detector_log_layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr)
                        .compact()
                        .with_filter(stderr_filter),
                )
                .init();
        }
    });
}

/// A layer writing `error`-and-above events to `detector.log`. `None` (a
/// silent no-op layer) if the file can't be opened, so a read-only working
/// directory degrades to stderr-only logging instead of failing startup.
fn detector_log_layer<S>() -> Option<impl Layer<S>>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("detector.log")
        .ok()?;

    Some(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .with_filter(EnvFilter::new("error")),
    )
}
