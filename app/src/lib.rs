pub mod app_module;
pub mod controllers;
pub mod services;
