use std::path::PathBuf;

pub fn default_version() -> u32 {
    1
}

pub fn default_max_candidates() -> usize {
    10
}

pub fn default_min_name_chars() -> usize {
    2
}

pub fn default_max_name_chars() -> usize {
    19
}

pub fn default_lookup_timeout_ms() -> u64 {
    5_000
}

pub fn default_batch_deadline_ms() -> u64 {
    15_000
}

pub fn default_scope_suffixes() -> Vec<String> {
    ["市", "省", "区", "县"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_debounce_ms() -> u64 {
    1_000
}

pub fn default_baidu_endpoint() -> String {
    "https://api.map.baidu.com/geocoding/v3/".to_string()
}

pub fn default_output_dir() -> PathBuf {
    PathBuf::from("routes")
}
