pub mod init;
pub mod session;
pub mod view;
