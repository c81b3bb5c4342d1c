use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global tracing subscriber.
///
/// `default_filter` is an `EnvFilter` directive such as `info` or
/// `delayer=debug`. `RUST_LOG` takes precedence when it is set. Output goes to
/// stderr so that the countdown on stdout stays readable.
pub fn init(default_filter: &str) -> Result<()> {
    let filter = build_filter(default_filter)?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))
        .context("Failed to install tracing subscriber")
}

fn build_filter(default_filter: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("Invalid log filter '{default_filter}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_level_and_target_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("delayer=debug,warn").is_ok());
    }
}
