// ABOUTME: Version string, REPL banner, and exit-code constants

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const WELCOME_MESSAGE: &str = "Lox interpreter";
pub const WELCOME_SUBTITLE: &str = "A tree-walking interpreter for a small scripting language";

/// Process exit codes for the `lox` CLI driver.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_USAGE: i32 = 64;
pub const EXIT_STATIC_ERROR: i32 = 65;
pub const EXIT_RUNTIME_ERROR: i32 = 70;
pub const EXIT_FILE_ERROR: i32 = 1;
