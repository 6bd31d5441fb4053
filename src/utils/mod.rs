pub mod suggest;
pub mod user_paths;
