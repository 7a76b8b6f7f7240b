pub mod quote;
pub mod recent;
pub mod search;
pub mod session;
pub mod setup;
pub mod ui;
pub mod view;
