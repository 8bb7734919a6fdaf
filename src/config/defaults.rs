pub fn default_concurrency() -> usize {
    4
}

pub fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_backoff_base_ms() -> u64 {
    1000
}
