pub mod app;
pub mod commands;
pub mod composer;
pub mod config;
pub mod error;
pub mod feeds;
pub mod logging;
pub mod post;
pub mod post_parser;
pub mod share;
pub mod ui;
