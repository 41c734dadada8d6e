pub mod gui;
pub mod http;
