//! One module per subcommand.

pub mod delete;
pub mod destroy;
pub mod export;
pub mod get;
pub mod init;
pub mod keygen;
pub mod list;
pub mod store;
pub mod update;
pub mod verify;
