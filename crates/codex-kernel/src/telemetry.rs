//! `tracing` subscriber setup shared by the service binaries.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, with `directives`
/// (e.g. `"codex_gateway=info"`) added on top.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing(directives: &[&str]) {
    let mut filter = EnvFilter::from_default_env();
    for directive in directives {
        match directive.parse::<Directive>() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("ignoring invalid log directive '{directive}': {e}"),
        }
    }

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
