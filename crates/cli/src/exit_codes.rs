//! Exit code registry. clap itself exits with 2 on argument errors.

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_RUNTIME: u8 = 1;
pub const EXIT_INVALID_CONFIG: u8 = 3;
