//! Shared providers, fixtures and servers for the integration tests

#![allow(dead_code)]

pub mod fixtures;
pub mod providers;
pub mod test_server;
pub mod upstream;

#[allow(unused_imports)]
pub use providers::TimingControlledProvider;
#[allow(unused_imports)]
pub use test_server::TestServer;
