pub mod config;
pub mod init;
pub mod package;
pub mod serve;
