pub mod agent;         // worker polling loop + coordinator client
pub mod config;        // environment-derived settings
pub mod engine;        // DAG builder + dependency scheduler
pub mod errors;        // error handling
pub mod observability;
pub mod parser;        // lexer, validator, RPN converter
pub mod protocol;      // wire types shared by orchestrator and agent
pub mod server;        // HTTP surface
pub mod traits;        // unified abstractions
