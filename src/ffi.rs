//! C FFI layer for cross-language interoperability.

use crate::config::RenderConfig;
use crate::render::ContentRenderer;
use crate::table::{contains_complex_table, convert_latex_table};
use libc::{c_char, c_int};
use std::ffi::{CStr, CString};
use std::ptr;

/// Result type for FFI operations.
#[repr(C)]
pub struct QbankResult {
    /// Pointer to result string (caller must free with qbank_free_string)
    pub data: *mut c_char,
    /// Error message if data is null (caller must free with qbank_free_string)
    pub error: *mut c_char,
}

impl QbankResult {
    fn ok(data: String) -> Self {
        match CString::new(data) {
            Ok(c_string) => Self {
                data: c_string.into_raw(),
                error: ptr::null_mut(),
            },
            Err(_) => Self::err("Output contains an interior NUL byte".to_string()),
        }
    }

    fn err(error: String) -> Self {
        let error = error.replace('\0', "");
        Self {
            data: ptr::null_mut(),
            error: CString::new(error).map_or(ptr::null_mut(), CString::into_raw),
        }
    }
}

unsafe fn input_str<'a>(input: *const c_char) -> Result<&'a str, QbankResult> {
    if input.is_null() {
        return Err(QbankResult::err("Null input pointer".to_string()));
    }
    CStr::from_ptr(input)
        .to_str()
        .map_err(|_| QbankResult::err("Invalid UTF-8 input".to_string()))
}

/// Render one question-bank field with the default configuration.
///
/// Rendering problems are reported inside the HTML, so `error` is only set
/// for a null or non-UTF-8 input.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - The returned strings must be freed with `qbank_free_string` or
///   `qbank_free_result`.
#[no_mangle]
pub unsafe extern "C" fn qbank_render(input: *const c_char) -> QbankResult {
    let input = match input_str(input) {
        Ok(s) => s,
        Err(e) => return e,
    };
    QbankResult::ok(ContentRenderer::default().render_field(input))
}

/// Render one field with a TOML configuration. A null `config` uses the
/// defaults.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - `config` must be null or a valid null-terminated UTF-8 string.
/// - The returned strings must be freed with `qbank_free_string` or
///   `qbank_free_result`.
#[no_mangle]
pub unsafe extern "C" fn qbank_render_with_config(
    input: *const c_char,
    config: *const c_char,
) -> QbankResult {
    let input = match input_str(input) {
        Ok(s) => s,
        Err(e) => return e,
    };

    let config = if config.is_null() {
        RenderConfig::default()
    } else {
        let source = match CStr::from_ptr(config).to_str() {
            Ok(s) => s,
            Err(_) => return QbankResult::err("Invalid UTF-8 config".to_string()),
        };
        match RenderConfig::from_toml(source) {
            Ok(c) => c,
            Err(e) => return QbankResult::err(format!("Config error: {}", e)),
        }
    };

    QbankResult::ok(ContentRenderer::new(config).render_field(input))
}

/// Convert a LaTeX `longtable` or `tabular` to an HTML table.
///
/// # Safety
///
/// - `code` must be a valid null-terminated UTF-8 string.
/// - The returned strings must be freed with `qbank_free_string` or
///   `qbank_free_result`.
#[no_mangle]
pub unsafe extern "C" fn qbank_convert_table(code: *const c_char, standalone: c_int) -> QbankResult {
    let code = match input_str(code) {
        Ok(s) => s,
        Err(e) => return e,
    };
    match convert_latex_table(code, standalone != 0) {
        Ok(html) => QbankResult::ok(html),
        Err(e) => QbankResult::err(format!("Table error: {}", e)),
    }
}

/// Returns 1 if `input` holds a complex table, 0 if not, -1 on bad input.
///
/// # Safety
///
/// - `input` must be null or a valid null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn qbank_contains_complex_table(input: *const c_char) -> c_int {
    if input.is_null() {
        return -1;
    }
    match CStr::from_ptr(input).to_str() {
        Ok(s) => c_int::from(contains_complex_table(s)),
        Err(_) => -1,
    }
}

/// Free a string returned by qbank functions.
///
/// # Safety
///
/// - `s` must be a pointer returned by a qbank function, or null.
#[no_mangle]
pub unsafe extern "C" fn qbank_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Free a result struct.
///
/// # Safety
///
/// - `result` must be a valid QbankResult.
#[no_mangle]
pub unsafe extern "C" fn qbank_free_result(result: QbankResult) {
    qbank_free_string(result.data);
    qbank_free_string(result.error);
}

/// Get the library version.
///
/// # Safety
///
/// The returned string is static and must not be freed.
#[no_mangle]
pub extern "C" fn qbank_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}
