/// Builds a closure for `map_err` that logs the error, together with the given message
/// and any extra tracing fields, before converting it into the target error type.
macro_rules! on_error {
    ($from:ty as $to:ty, $msg:tt) => {
        |error: $from| -> $to {
            error!(error = error.to_string(), $msg);
            error.into()
        }
    };
    ($to:ty, $msg:tt) => {
        |error| -> $to {
            error!(error = error.to_string(), $msg);
            <$to>::from(error)
        }
    };
    ($to:ty, $msg:tt, $($field:ident = $value:expr),+) => {
        |error| -> $to {
            error!(error = error.to_string(), $($field = $value),+, $msg);
            <$to>::from(error)
        }
    };
}

pub(crate) use on_error;
