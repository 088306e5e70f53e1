//! Constants shared across the Taskly workspace

/// Default database filename
pub const DATABASE_FILENAME: &str = "taskly.sqlite";

/// First page number (pages are 1-based)
pub const DEFAULT_PAGE: u32 = 1;

/// Maximum page number accepted by list endpoints
pub const MAX_PAGE: u32 = 1000;

/// Default number of items returned per page
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 50;

/// Maximum number of items returned per page
pub const MAX_ITEMS_PER_PAGE: u32 = 200;

/// Maximum length of entity names
pub const MAX_NAME_LENGTH: usize = 100;

/// Default HTTP server bind address
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default HTTP server port
pub const DEFAULT_SERVER_PORT: u16 = 8000;
