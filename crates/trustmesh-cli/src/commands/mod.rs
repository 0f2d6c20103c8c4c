pub mod init;
pub mod reputation;
