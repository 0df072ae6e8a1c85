//! C FFI bindings for the MOO parser.
//!
//! Exposes `moo_parse_json` and `moo_string_free` for use from other
//! runtimes via FFI.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use moo::MooError;

/// Parse MOO source and return the AST as a JSON string.
///
/// # Safety
///
/// - `source_utf8` must be a valid null-terminated UTF-8 string.
/// - `out_error_json_utf8` must be a valid pointer to a `*mut c_char`
///   (initially null).
///
/// On success, returns a pointer to a null-terminated UTF-8 JSON string.
/// The caller must free it with `moo_string_free`.
///
/// On error, returns null and writes an error JSON string to
/// `*out_error_json_utf8`. The caller must free the error string with
/// `moo_string_free`.
#[no_mangle]
pub unsafe extern "C" fn moo_parse_json(
    source_utf8: *const c_char,
    out_error_json_utf8: *mut *mut c_char,
) -> *mut c_char {
    // Safety: caller guarantees valid pointers
    let source = match CStr::from_ptr(source_utf8).to_str() {
        Ok(s) => s,
        Err(e) => {
            write_error(out_error_json_utf8, "IoError", &e.to_string(), None, None);
            return ptr::null_mut();
        }
    };

    let program = match moo::parse(source) {
        Ok(program) => program,
        Err(err) => {
            write_moo_error(out_error_json_utf8, &err);
            return ptr::null_mut();
        }
    };

    let json = match serde_json::to_string(&program) {
        Ok(json) => json,
        Err(e) => {
            write_error(out_error_json_utf8, "IoError", &e.to_string(), None, None);
            return ptr::null_mut();
        }
    };

    match CString::new(json) {
        Ok(cs) => cs.into_raw(),
        Err(e) => {
            write_error(out_error_json_utf8, "IoError", &e.to_string(), None, None);
            ptr::null_mut()
        }
    }
}

/// Free a string previously returned by `moo_parse_json` or written to
/// `out_error_json_utf8`.
///
/// # Safety
///
/// `p` must be a pointer previously returned by this crate via
/// `CString::into_raw`, or null (in which case this is a no-op).
#[no_mangle]
pub unsafe extern "C" fn moo_string_free(p: *mut c_char) {
    if !p.is_null() {
        drop(CString::from_raw(p));
    }
}

/// Convert a `MooError` to error JSON and write it to the output pointer.
unsafe fn write_moo_error(out: *mut *mut c_char, err: &MooError) {
    let (error_type, message, line, column) = match err {
        MooError::ParseError { message, location } => (
            "ParseError",
            message.clone(),
            Some(location.line),
            Some(location.column),
        ),
        MooError::LoadError { message } => ("LoadError", message.clone(), None, None),
        MooError::IoError(e) => ("IoError", e.to_string(), None, None),
    };

    write_error(out, error_type, &message, line, column);
}

/// Write an error JSON string to the output pointer.
unsafe fn write_error(
    out: *mut *mut c_char,
    error_type: &str,
    message: &str,
    line: Option<usize>,
    column: Option<usize>,
) {
    let json = serde_json::json!({
        "type": error_type,
        "message": message,
        "line": line,
        "column": column,
    });

    if let Ok(cs) = CString::new(json.to_string()) {
        *out = cs.into_raw();
    }
}
