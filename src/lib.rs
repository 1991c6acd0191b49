pub mod app;
pub mod controller;
pub mod debounce;
pub mod dimensions;
pub mod feed;
pub mod filter;
pub mod fs_utils;
pub mod image_utils;
pub mod naming;
pub mod notify;
pub mod selection;
pub mod session;
pub mod settings;
pub mod ui;
