pub mod add;
pub mod common;
pub mod completions;
pub mod config;
pub mod count;
pub mod delete;
pub mod edit;
pub mod list;
pub mod restore;
pub mod search;
pub mod show;
pub mod sync;
