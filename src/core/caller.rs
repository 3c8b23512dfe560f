//! Call-site capture
//!
//! Location comes from `#[track_caller]`: every public entry point that
//! records a caller is itself `#[track_caller]`, so the reported site is the
//! user's call and never a wrapper inside this crate. A wrapper written by a
//! user is skipped the same way once it carries the attribute.
//!
//! `Location` has no notion of the enclosing function, so the function name
//! is only known when the call goes through one of the crate macros, which
//! resolve it at compile time with [`function_path!`](crate::function_path).

use serde::{Deserialize, Serialize};
use std::panic::Location;

/// Source position of a logging call.
///
/// The default value (empty strings, line 0) is what a record carries when
/// nothing could be resolved; every renderer accepts it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerInfo {
    pub file: String,
    pub line: u32,
    /// Fully qualified function path, e.g. `my_app::http::handler`
    pub function: String,
    #[serde(skip)]
    pub short_function: String,
}

impl CallerInfo {
    pub fn new(file: &str, line: u32, function: &str) -> Self {
        let function = trim_closures(function);
        Self {
            file: file.to_string(),
            line,
            short_function: short_name(function),
            function: function.to_string(),
        }
    }

    /// Location of the nearest caller not marked `#[track_caller]`.
    #[track_caller]
    pub fn capture() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), "")
    }

    pub fn is_resolved(&self) -> bool {
        !self.file.is_empty()
    }
}

fn trim_closures(mut path: &str) -> &str {
    while let Some(stripped) = path.strip_suffix("::{{closure}}") {
        path = stripped;
    }
    path
}

/// Last two `::` segments, so `app::http::routes::index` becomes `routes::index`.
fn short_name(path: &str) -> String {
    let segments: Vec<&str> = path.rsplitn(3, "::").collect();
    match segments.as_slice() {
        [last, parent, ..] => format!("{}::{}", parent, last),
        [last] => (*last).to_string(),
        [] => String::new(),
    }
}

/// Expands to the path of the enclosing function as a `&'static str`.
#[macro_export]
macro_rules! function_path {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        &name[..name.len() - "::__here".len()]
    }};
}

/// Expands to a [`CallerInfo`] for the current file, line and function.
#[macro_export]
macro_rules! caller {
    () => {
        $crate::core::CallerInfo::new(file!(), line!(), $crate::function_path!())
    };
}
