// Composition root for the roster client.
//
// - Read config from the environment.
// - Build the shared gateway client and the local state file.
// - Wire HTTP adapters into the use case handlers and run one command.

pub mod cli;
pub mod commands;
pub mod config;
