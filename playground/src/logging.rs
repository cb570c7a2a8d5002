use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the global logger, later calls are ignored.
///
/// `filter` uses the `env_logger` syntax, e.g. `"gl_wrapper=debug,info"`.
/// Without one `RUST_LOG` is consulted before falling back to `info`.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.init();

        log::debug!("logging initialized");
    });
}
