//! Command-line surface of the HR management service: the `serve` command
//! boots the HTTP API, `demo` seeds a sample tenant and prints the
//! effective-policy walk.

mod cli;
mod demo;
mod infra;
mod routes;
mod server;

pub use cli::run;
