pub mod archive;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod images;
pub mod interactive;
pub mod scanner;
