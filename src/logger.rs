use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the process logger once. `RUST_LOG` overrides the default level.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let default_level = if verbose { "debug" } else { "info" };
        Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{} - {}: {}",
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .init();
    });
}

pub fn set_log_level(level: LevelFilter) {
    log::set_max_level(level);
}
