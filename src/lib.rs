pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod paths;
pub mod schedule;
pub mod validation;

#[cfg(test)]
pub mod testing;
