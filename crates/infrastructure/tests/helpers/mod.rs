#![allow(dead_code)]
pub mod builders;
pub mod dns_server_mock;
pub mod scripted;

pub use builders::MessageFixtures;
pub use dns_server_mock::{MockBehavior, MockDnsServer};
pub use scripted::{FirstSelector, FlakyExchanger, ScriptedExchanger, Step, StaticHostResolver};
