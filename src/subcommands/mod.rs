pub mod init_table;
pub mod list;
