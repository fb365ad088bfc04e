// vaultsock-cli: interactive console for a wallet-service WebSocket API.

pub mod config;
pub mod console;
pub mod repl;
pub mod transport;
pub mod view;
