pub mod agent;
pub mod config;
pub mod errors;
pub mod models;
pub mod outcome;
pub mod printer;
pub mod prompt_template;
pub mod providers;
pub mod tool;
pub mod tools;
