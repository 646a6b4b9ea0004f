pub mod assembler;
pub mod balances;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logger;
pub mod parsable_instructions;
pub mod parsers;
pub mod pipeline;
pub mod programs;
pub mod services;
pub mod summary;
pub mod types;

#[cfg(test)]
mod test_utils;
