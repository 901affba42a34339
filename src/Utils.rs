//! different utility modules used throughout the project
/// terminal and file logging
pub mod logger;
