/// Name of the environment variable containing the path to the configuration file.
/// If not set, defaults to
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/xdeco/config.toml` or `$HOME/.config/xdeco/config.toml`
///  (2) on Windows: `%APPDATA%\xdeco\config.toml`
pub const ENV_CONFIG_PATH: &str = "XDECO_CONFIG_PATH";

/// Directory holding the configuration file under the platform configuration directory.
pub const CONFIG_DIR_NAME: &str = "xdeco";

pub const CONFIG_FILE_NAME: &str = "config.toml";
