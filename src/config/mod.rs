pub mod loader;
pub mod service;
pub mod settings;
pub mod validator;
