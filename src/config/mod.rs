mod settings;

pub use settings::{save_export_path, Config, ConfigError, ExportKey, EXAMPLE_CONFIG};
