//! Logger capability consumed by the core.
//!
//! The core emits lifecycle and check-failure events only; everything else
//! is the checkers' business. The default [`TracingLogger`] forwards to the
//! `tracing` ecosystem; [`NoopLogger`] silences the library.

use std::fmt;

use serde_json::Value;

/// Structured key/value fields attached to a log entry.
pub type Fields = Vec<(&'static str, Value)>;

/// Build a field list from `(key, value)` pairs.
pub fn fields<I>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    pairs.into_iter().collect()
}

/// Four-level structured logger the core calls for lifecycle and
/// check-failure events. Implement this to route the library's log output
/// into the host application's logging setup.
pub trait Logger: Send + Sync {
    fn debug(&self, msg: &str, fields: &Fields);
    fn info(&self, msg: &str, fields: &Fields);
    fn warn(&self, msg: &str, fields: &Fields);
    fn error(&self, msg: &str, fields: &Fields);
}

/// Renders fields as `k=v` pairs for log backends without native
/// structured-field support.
struct Render<'a>(&'a Fields);

impl fmt::Display for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match value {
                Value::String(s) => write!(f, "{key}={s}")?,
                other => write!(f, "{key}={other}")?,
            }
        }
        Ok(())
    }
}

/// Default logger: forwards each entry to a `tracing` event at the matching
/// level, with the fields rendered into a single `fields` value.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, msg: &str, fields: &Fields) {
        tracing::debug!(fields = %Render(fields), "{}", msg);
    }

    fn info(&self, msg: &str, fields: &Fields) {
        tracing::info!(fields = %Render(fields), "{}", msg);
    }

    fn warn(&self, msg: &str, fields: &Fields) {
        tracing::warn!(fields = %Render(fields), "{}", msg);
    }

    fn error(&self, msg: &str, fields: &Fields) {
        tracing::error!(fields = %Render(fields), "{}", msg);
    }
}

/// Discards everything. Installed by
/// [`Health::disable_logging`](crate::Health::disable_logging).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _msg: &str, _fields: &Fields) {}
    fn info(&self, _msg: &str, _fields: &Fields) {}
    fn warn(&self, _msg: &str, _fields: &Fields) {}
    fn error(&self, _msg: &str, _fields: &Fields) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_fields_as_pairs() {
        let fields = fields([("check", json!("db")), ("fatal", json!(true))]);
        assert_eq!(Render(&fields).to_string(), "check=db fatal=true");
    }

    #[test]
    fn renders_empty_fields_as_empty() {
        assert_eq!(Render(&Fields::new()).to_string(), "");
    }
}
