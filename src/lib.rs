#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate tracing;
#[cfg(test)]
#[macro_use]
extern crate serde_json;

pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod model;
pub mod projects;
pub mod services;
#[cfg(test)]
mod test_utils;
pub mod widgets;
pub mod workflow;
