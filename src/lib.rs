pub mod config;
pub mod contact_list;
pub mod main_module;
pub mod shared;
