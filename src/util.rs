/// Logs the error of a `Result` that is otherwise ignored.
macro_rules! log_if_err {
    ($result:expr, $fmt:expr) => {{
        if let Err(e) = $result {
            error!(concat!($fmt, ": {}"), e);
        }
    }};
    ($result:expr, $fmt:expr, $($arg:tt)*) => {{
        if let Err(e) = $result {
            error!(concat!($fmt, ": {}"), $($arg)*, e);
        }
    }};
}
