mod env;
mod error;

pub use env::{get_env_path, get_env_var};
pub use error::EnvError;
