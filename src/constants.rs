// src/constants.rs

/// System-wide configuration layer.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/dcsh.yml";

/// Name of the per-user configuration file (inside the home directory).
pub const USER_CONFIG_FILENAME: &str = ".dcsh.yml";

/// Name of the project-local configuration file (inside the working directory).
pub const PROJECT_CONFIG_FILENAME: &str = ".dcsh.yml";

/// Project descriptor candidates, in lookup order.
pub const COMPOSE_FILENAMES: &[&str] = &["docker-compose.yml", "docker-compose.yaml"];

/// Top-level section of the project descriptor that holds embedded dcsh configuration.
pub const EMBEDDED_SECTION: &str = "x-dcsh";

/// Overrides the system-wide configuration path.
pub const SYSTEM_CONFIG_ENV: &str = "DCSH_SYSTEM_CONFIG";

/// Overrides the per-user configuration path.
pub const USER_CONFIG_ENV: &str = "DCSH_USER_CONFIG";

/// Key under which every compiled task stores its final argument vector.
pub const COMPILED_ARGS_KEY: &str = "compiled_args";
