//! C-compatible FFI API for cross-language bindings.
//!
//! # ABI Contract
//!
//! All exported functions use `extern "C"` calling convention and `#[no_mangle]`
//! to ensure stable symbol names. Inputs and outputs are UTF-8 JSON using
//! the same camelCase shapes the editor persists.
//!
//! ## Memory management
//! - Strings returned through `out_json` are allocated on the Rust heap.
//! - Callers **must** free them with `faqforge_free_string`.
//! - Passing a null pointer to the free function is a no-op.
//!
//! ## Error handling
//! - Functions that can fail return a `c_int`:
//!   `0` success, `1` null pointer, `2` invalid UTF-8, `3` parse or
//!   processing failure, `4` nothing to extract.
//! - Error details can be retrieved via `faqforge_last_error`.
//!
//! ## Thread safety
//! - The rendering core has no shared mutable state, and
//!   `faqforge_last_error` uses a thread-local, so every function may be
//!   called from multiple threads.
//!
//! ## Usage from Go (cgo)
//! ```go
//! // #cgo LDFLAGS: -lfaq_forge
//! // #include <stdint.h>
//! // extern int faqforge_render_payload(const uint8_t* config, uint32_t config_len,
//! //                                    const char* template_json, char** out_json);
//! // extern const char* faqforge_last_error();
//! // extern void faqforge_free_string(char* s);
//! import "C"
//! ```

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::slice;

use crate::accordion::AnswerVisibility;
use crate::extract::extract_styles;
use crate::payload::EmbedResponse;
use crate::pipeline::{render_payload, FaqConfig, RenderOptions};
use crate::protection::ProtectionMap;
use crate::templates::Template;

const OK: c_int = 0;
const ERR_NULL: c_int = 1;
const ERR_UTF8: c_int = 2;
const ERR_FAILED: c_int = 3;
const ERR_NOTHING: c_int = 4;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = RefCell::new(None);
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Borrow `len` bytes at `data` as UTF-8.
///
/// # Safety
/// `data` must be non-null and point to `len` readable bytes.
unsafe fn str_from_raw<'a>(data: *const u8, len: u32) -> Result<&'a str, c_int> {
    let bytes = slice::from_raw_parts(data, len as usize);
    std::str::from_utf8(bytes).map_err(|e| {
        set_last_error(&format!("Invalid UTF-8: {e}"));
        ERR_UTF8
    })
}

/// Borrow an optional null-terminated string. Null maps to `None`.
///
/// # Safety
/// `s`, if non-null, must point to a valid null-terminated string.
unsafe fn optional_cstr<'a>(s: *const c_char) -> Result<Option<&'a str>, c_int> {
    if s.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(s).to_str().map(Some).map_err(|e| {
        set_last_error(&format!("Invalid UTF-8: {e}"));
        ERR_UTF8
    })
}

/// Hand `json` to the caller through `out`.
///
/// # Safety
/// `out` must be a valid pointer.
unsafe fn write_out(out: *mut *mut c_char, json: String) -> c_int {
    match CString::new(json) {
        Ok(cs) => {
            *out = cs.into_raw();
            OK
        }
        Err(_) => {
            *out = ptr::null_mut();
            set_last_error("JSON contained null byte");
            ERR_FAILED
        }
    }
}

// ---------------------------------------------------------------------------
// C-compatible option types
// ---------------------------------------------------------------------------

/// Which answers are rendered open, for use in [`FaqForgeRenderOptions`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub enum FaqForgeAnswerVisibility {
    /// Every answer closed (default).
    Collapsed = 0,
    /// Only the first answer open.
    FirstExpanded = 1,
    /// Every answer open.
    Expanded = 2,
}

/// Optional render options passed to [`faqforge_render_payload_ex`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FaqForgeRenderOptions {
    pub answer_visibility: FaqForgeAnswerVisibility,
}

impl From<&FaqForgeRenderOptions> for RenderOptions {
    fn from(opts: &FaqForgeRenderOptions) -> Self {
        let answer_visibility = match opts.answer_visibility {
            FaqForgeAnswerVisibility::Collapsed => AnswerVisibility::Collapsed,
            FaqForgeAnswerVisibility::FirstExpanded => AnswerVisibility::FirstExpanded,
            FaqForgeAnswerVisibility::Expanded => AnswerVisibility::Expanded,
        };
        RenderOptions { answer_visibility }
    }
}

// ---------------------------------------------------------------------------
// Core API
// ---------------------------------------------------------------------------

/// Render an FAQ config to the public embed response JSON
/// (`{html, css, schema, integrity}`).
///
/// # Parameters
/// - `config_ptr`, `config_len`: UTF-8 `FaqConfig` JSON (not necessarily
///   null-terminated)
/// - `template_json`: null-terminated `{html, css, js?}` JSON, or `NULL` to
///   render with the built-in fallback template
/// - `out_json`: on success, receives a null-terminated JSON string
///
/// # Returns
/// `0` on success, non-zero on error. On error, call `faqforge_last_error`.
///
/// # Safety
/// - `config_ptr` must point to `config_len` valid bytes.
/// - `template_json`, if non-null, must be a valid null-terminated string.
/// - `out_json` must be a valid pointer; free `*out_json` with
///   `faqforge_free_string`.
#[no_mangle]
pub unsafe extern "C" fn faqforge_render_payload(
    config_ptr: *const u8,
    config_len: u32,
    template_json: *const c_char,
    out_json: *mut *mut c_char,
) -> c_int {
    faqforge_render_payload_ex(config_ptr, config_len, template_json, ptr::null(), out_json)
}

/// [`faqforge_render_payload`] with explicit [`FaqForgeRenderOptions`].
/// Pass `NULL` for `opts` to use the defaults.
///
/// # Safety
/// Same as `faqforge_render_payload`. `opts`, if non-null, must point to a
/// fully-initialised [`FaqForgeRenderOptions`].
#[no_mangle]
pub unsafe extern "C" fn faqforge_render_payload_ex(
    config_ptr: *const u8,
    config_len: u32,
    template_json: *const c_char,
    opts: *const FaqForgeRenderOptions,
    out_json: *mut *mut c_char,
) -> c_int {
    if config_ptr.is_null() || out_json.is_null() {
        set_last_error("Null pointer argument");
        return ERR_NULL;
    }

    let config_text = match str_from_raw(config_ptr, config_len) {
        Ok(s) => s,
        Err(rc) => return rc,
    };
    let config = match FaqConfig::from_json(config_text) {
        Ok(c) => c,
        Err(e) => {
            set_last_error(&format!("Invalid config JSON: {e}"));
            return ERR_FAILED;
        }
    };

    let template = match optional_cstr(template_json) {
        Ok(None) => Template::fallback(),
        Ok(Some(json)) => match serde_json::from_str::<Template>(json) {
            Ok(t) => t,
            Err(e) => {
                set_last_error(&format!("Invalid template JSON: {e}"));
                return ERR_FAILED;
            }
        },
        Err(rc) => return rc,
    };

    let options = if opts.is_null() {
        RenderOptions::default()
    } else {
        RenderOptions::from(&*opts)
    };

    let response = EmbedResponse::from(render_payload(&template, &config, &options));
    write_out(out_json, response.to_json())
}

/// Recover a `StyleSpec` JSON from template (or combined) CSS.
///
/// # Parameters
/// - `css_ptr`, `css_len`: UTF-8 CSS
/// - `template_id`: null-terminated template id, or `NULL` to match only
///   unscoped rules
/// - `out_json`: on success, receives the style JSON
///
/// # Returns
/// `0` on success, `4` when the CSS is empty.
///
/// # Safety
/// - `css_ptr` must point to `css_len` valid bytes.
/// - `template_id`, if non-null, must be a valid null-terminated string.
/// - `out_json` must be a valid pointer; free with `faqforge_free_string`.
#[no_mangle]
pub unsafe extern "C" fn faqforge_extract_styles(
    css_ptr: *const u8,
    css_len: u32,
    template_id: *const c_char,
    out_json: *mut *mut c_char,
) -> c_int {
    if css_ptr.is_null() || out_json.is_null() {
        set_last_error("Null pointer argument");
        return ERR_NULL;
    }

    let css = match str_from_raw(css_ptr, css_len) {
        Ok(s) => s,
        Err(rc) => return rc,
    };
    let template_id = match optional_cstr(template_id) {
        Ok(id) => id,
        Err(rc) => return rc,
    };

    let Some(styles) = extract_styles(css, template_id) else {
        *out_json = ptr::null_mut();
        set_last_error("CSS is empty, nothing to extract");
        return ERR_NOTHING;
    };
    match serde_json::to_string(&styles) {
        Ok(json) => write_out(out_json, json),
        Err(e) => {
            set_last_error(&e.to_string());
            ERR_FAILED
        }
    }
}

/// List the style paths a template's CSS locks, as a JSON array of dotted
/// paths (e.g. `["backgroundColor","heading.color"]`).
///
/// # Safety
/// - `css_ptr` must point to `css_len` valid bytes.
/// - `out_json` must be a valid pointer; free with `faqforge_free_string`.
#[no_mangle]
pub unsafe extern "C" fn faqforge_parse_protection(
    css_ptr: *const u8,
    css_len: u32,
    out_json: *mut *mut c_char,
) -> c_int {
    if css_ptr.is_null() || out_json.is_null() {
        set_last_error("Null pointer argument");
        return ERR_NULL;
    }

    let css = match str_from_raw(css_ptr, css_len) {
        Ok(s) => s,
        Err(rc) => return rc,
    };
    match serde_json::to_string(&ProtectionMap::parse(css)) {
        Ok(json) => write_out(out_json, json),
        Err(e) => {
            set_last_error(&e.to_string());
            ERR_FAILED
        }
    }
}

// ---------------------------------------------------------------------------
// Memory management
// ---------------------------------------------------------------------------

/// Free a string returned through an `out_json` parameter.
///
/// # Safety
/// `s` must have been returned by one of the `faqforge_*` functions.
#[no_mangle]
pub unsafe extern "C" fn faqforge_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Retrieve the last error message. Returns a null-terminated string.
///
/// The returned pointer is valid until the next failing `faqforge_*` call on
/// the same thread. The caller should **not** free this pointer – it is
/// managed internally.
///
/// Returns null if no error has occurred.
#[no_mangle]
pub extern "C" fn faqforge_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        let borrow = e.borrow();
        match borrow.as_ref() {
            Some(cs) => cs.as_ptr(),
            None => ptr::null(),
        }
    })
}

/// Return the library version as a null-terminated string.
/// The caller must **not** free this pointer.
#[no_mangle]
pub extern "C" fn faqforge_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
