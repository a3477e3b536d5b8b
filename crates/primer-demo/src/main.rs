use primer_engine::device::WgpuInit;
use primer_engine::logging::{init_logging, LoggingConfig};
use primer_engine::window::{Runtime, RuntimeConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Primer Triangle".to_string(),
        ..RuntimeConfig::default()
    };

    log::info!("starting {}", config.title);
    Runtime::run(config, WgpuInit::default())
}
