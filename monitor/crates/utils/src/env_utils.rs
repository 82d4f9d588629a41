use color_eyre::eyre::WrapErr;
use color_eyre::Result;

pub fn get_env_var(key: &str) -> Result<String> {
    std::env::var(key).wrap_err_with(|| format!("Environment variable {} is not set", key))
}

pub fn get_env_var_or_default(key: &str, default: &str) -> String {
    get_env_var(key).unwrap_or(default.to_string())
}
