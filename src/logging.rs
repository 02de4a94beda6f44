use std::io;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Filter built from `RUST_LOG`; INFO applies only when it sets no level.
pub fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
}

/// Same as [`env_filter`] for an explicit directive string.
pub fn filter_from(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

/// Installs the global subscriber. Logs go to stderr so stdout stays
/// `key=value` output.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured(directives: &str) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter_from(directives))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(tag = "a", "starting configuration");
            tracing::debug!(bot_id = "a0", rows = 2, "run parsed");
        });
        let bytes = capture.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn debug_directive_enables_per_run_events() {
        let out = captured("debug");
        assert!(out.contains("starting configuration"));
        assert!(out.contains("run parsed"));
    }

    #[test]
    fn info_is_the_fallback_level() {
        let out = captured("");
        assert!(out.contains("starting configuration"));
        assert!(!out.contains("run parsed"));
    }

    #[test]
    fn warn_directive_is_not_raised_to_info() {
        let out = captured("warn");
        assert!(!out.contains("starting configuration"));
    }
}
