pub mod init;
pub mod plan;
