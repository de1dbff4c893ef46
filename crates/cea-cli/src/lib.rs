pub mod cli;

pub use cli::{CatalogCommands, Cli, Commands, DispatchCommands, NetworkCommands, StorageCommands};
