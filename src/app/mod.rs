mod commands;
mod services;

pub use commands::run;
pub use services::Services;
