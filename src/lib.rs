pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod services;
