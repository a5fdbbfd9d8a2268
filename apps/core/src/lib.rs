pub mod action_executor;
pub mod candidate_source;
pub mod config;
pub mod contract;
pub mod finder;
pub mod gateway;
pub mod input_buffer;
pub mod keys;
pub mod logging;
pub mod matcher;
pub mod mode;
pub mod presenter;
pub mod ranker;
pub mod runtime;
pub mod session;
