//! Process-wide logging setup for the binary.

use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable. wgpu and naga are chatty at
/// info.
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,wgpu=warn,naga=warn";

pub fn init_tracing() {
    // RUST_LOG=ghostcursor_core=debug,ghostcursor_bridge=debug
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .with_line_number(true)
        .compact()
        .try_init();
}

/// Route panics through tracing so they land next to the frame-loop logs.
/// The release profile aborts on panic, so this is the only trace left.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = panic_message(info.payload());
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());
        let thread = std::thread::current();
        let thread = thread.name().unwrap_or("<unnamed>");

        tracing::error!(%location, %thread, "panic: {payload}");
    }));
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}
