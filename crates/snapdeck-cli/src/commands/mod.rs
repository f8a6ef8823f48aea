pub mod config;
pub mod list;
pub mod replay;
pub mod run;
