/// Alias for `format!()`
#[macro_export]
macro_rules! fmt {
    ($($arg:tt)*) => {
        format!($($arg)*)
    };
}

/// Alias for `.to_string()`
#[macro_export]
macro_rules! str {
    ($s:expr) => {
        $s.to_string()
    };
}
