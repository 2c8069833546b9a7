mod cli;
mod config;
mod whitelist;
