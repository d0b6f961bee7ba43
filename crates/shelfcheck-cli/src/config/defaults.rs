pub fn default_expected_title() -> String {
    "Яндекс Маркет".to_string()
}

pub fn default_timeout_minutes() -> u64 {
    10
}

pub fn default_min_products() -> usize {
    12
}

pub fn default_headless() -> bool {
    !cfg!(feature = "visible")
}

pub fn default_window_width() -> u32 {
    1920
}

pub fn default_window_height() -> u32 {
    1080
}

pub fn default_wait_timeout_secs() -> u64 {
    60
}
