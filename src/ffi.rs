//! C FFI layer for cross-language interoperability.

use crate::palette::Palette;
use crate::render::{FormulaRenderer, MathBackend, RenderConfig};
use libc::{c_char, c_int};
use std::ffi::{CStr, CString};
use std::ptr;

/// Opaque handle to a symbol palette.
pub struct MathfieldPalette {
    inner: Palette,
}

/// Result type for FFI operations.
#[repr(C)]
pub struct MathfieldResult {
    /// Pointer to result string (caller must free with mathfield_free_string)
    pub data: *mut c_char,
    /// Error message if data is null (caller must free with mathfield_free_string)
    pub error: *mut c_char,
}

impl MathfieldResult {
    fn ok(data: String) -> Self {
        match CString::new(data) {
            Ok(c_string) => Self {
                data: c_string.into_raw(),
                error: ptr::null_mut(),
            },
            Err(_) => Self::err("Output contained a NUL byte"),
        }
    }

    fn err(error: &str) -> Self {
        let error = CString::new(error.replace('\0', "")).unwrap_or_default();
        Self {
            data: ptr::null_mut(),
            error: error.into_raw(),
        }
    }
}

fn backend_from_c(backend: c_int) -> MathBackend {
    match backend {
        1 => MathBackend::KaTeX,
        _ => MathBackend::MathML,
    }
}

/// Render text with embedded math spans.
///
/// `backend`: 0 = MathML, 1 = KaTeX.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - The returned strings must be freed with `mathfield_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mathfield_render(input: *const c_char, backend: c_int) -> MathfieldResult {
    if input.is_null() {
        return MathfieldResult::err("Null input pointer");
    }

    let input = match CStr::from_ptr(input).to_str() {
        Ok(s) => s,
        Err(_) => return MathfieldResult::err("Invalid UTF-8 input"),
    };

    let renderer = FormulaRenderer::new(&RenderConfig {
        backend: backend_from_c(backend),
    });
    MathfieldResult::ok(renderer.render(input))
}

/// Create a palette over the built-in symbol categories.
///
/// # Safety
///
/// The returned palette must be freed with `mathfield_palette_free`.
#[no_mangle]
pub extern "C" fn mathfield_palette_new() -> *mut MathfieldPalette {
    Box::into_raw(Box::new(MathfieldPalette {
        inner: Palette::new(),
    }))
}

/// List the palette's categories as JSON.
///
/// # Safety
///
/// - `palette` must be a valid pointer from `mathfield_palette_new`.
/// - The returned strings must be freed with `mathfield_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mathfield_palette_categories_json(
    palette: *const MathfieldPalette,
) -> MathfieldResult {
    if palette.is_null() {
        return MathfieldResult::err("Null palette pointer");
    }

    match serde_json::to_string(&(*palette).inner.categories()) {
        Ok(json) => MathfieldResult::ok(json),
        Err(e) => MathfieldResult::err(&format!("JSON error: {}", e)),
    }
}

/// Toggle a category open or closed. Returns the open index, or -1.
///
/// # Safety
///
/// - `palette` must be a valid pointer from `mathfield_palette_new`.
#[no_mangle]
pub unsafe extern "C" fn mathfield_palette_toggle(
    palette: *mut MathfieldPalette,
    category: usize,
) -> c_int {
    if palette.is_null() {
        return -1;
    }

    match (*palette).inner.toggle_category(category) {
        Some(open) => c_int::try_from(open).unwrap_or(-1),
        None => -1,
    }
}

/// Return the `$`-wrapped fragment for a symbol.
///
/// # Safety
///
/// - `palette` must be a valid pointer from `mathfield_palette_new`.
/// - The returned strings must be freed with `mathfield_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mathfield_palette_select(
    palette: *mut MathfieldPalette,
    category: usize,
    symbol: usize,
) -> MathfieldResult {
    if palette.is_null() {
        return MathfieldResult::err("Null palette pointer");
    }

    match (*palette).inner.select(category, symbol) {
        Some(fragment) => MathfieldResult::ok(fragment),
        None => MathfieldResult::err("No such symbol"),
    }
}

/// Free a palette handle.
///
/// # Safety
///
/// - `palette` must be a pointer returned by `mathfield_palette_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn mathfield_palette_free(palette: *mut MathfieldPalette) {
    if !palette.is_null() {
        drop(Box::from_raw(palette));
    }
}

/// Free a string returned by mathfield functions.
///
/// # Safety
///
/// - `s` must be a pointer returned by a mathfield function, or null.
#[no_mangle]
pub unsafe extern "C" fn mathfield_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Free a result struct.
///
/// # Safety
///
/// - `result` must be a valid MathfieldResult.
#[no_mangle]
pub unsafe extern "C" fn mathfield_free_result(result: MathfieldResult) {
    mathfield_free_string(result.data);
    mathfield_free_string(result.error);
}

/// Get the library version.
///
/// # Safety
///
/// The returned string is static and must not be freed.
#[no_mangle]
pub extern "C" fn mathfield_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

// Generate C header content for documentation
/// ```c
/// // mathfield.h
/// #ifndef MATHFIELD_H
/// #define MATHFIELD_H
///
/// #include <stddef.h>
///
/// typedef struct MathfieldPalette MathfieldPalette;
///
/// typedef struct {
///     char* data;
///     char* error;
/// } MathfieldResult;
///
/// MathfieldResult mathfield_render(const char* input, int backend); // 0 = MathML, 1 = KaTeX
/// MathfieldPalette* mathfield_palette_new(void);
/// MathfieldResult mathfield_palette_categories_json(const MathfieldPalette* palette);
/// int mathfield_palette_toggle(MathfieldPalette* palette, size_t category);
/// MathfieldResult mathfield_palette_select(MathfieldPalette* palette, size_t category, size_t symbol);
/// void mathfield_palette_free(MathfieldPalette* palette);
/// void mathfield_free_string(char* s);
/// void mathfield_free_result(MathfieldResult result);
/// const char* mathfield_version(void);
///
/// #endif
/// ```
const _: () = ();

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take(result: MathfieldResult) -> Result<String, String> {
        let out = if result.data.is_null() {
            Err(CStr::from_ptr(result.error).to_string_lossy().into_owned())
        } else {
            Ok(CStr::from_ptr(result.data).to_string_lossy().into_owned())
        };
        mathfield_free_result(result);
        out
    }

    #[test]
    fn test_render_roundtrip() {
        let input = CString::new("x = $a$").unwrap();
        let out = unsafe { take(mathfield_render(input.as_ptr(), 1)) }.unwrap();
        assert_eq!(out, r#"x = <span class="math inline">\(a\)</span>"#);
    }

    #[test]
    fn test_render_null() {
        let err = unsafe { take(mathfield_render(ptr::null(), 0)) }.unwrap_err();
        assert_eq!(err, "Null input pointer");
    }

    #[test]
    fn test_palette() {
        unsafe {
            let palette = mathfield_palette_new();
            assert_eq!(mathfield_palette_toggle(palette, 1), 1);
            assert_eq!(mathfield_palette_toggle(palette, 1), -1);

            let json = take(mathfield_palette_categories_json(palette)).unwrap();
            assert!(json.contains("\"name\":\"Greek\""));

            let fragment = take(mathfield_palette_select(palette, 1, 0)).unwrap();
            assert_eq!(fragment, "$\\alpha$");
            assert!(take(mathfield_palette_select(palette, 99, 0)).is_err());

            mathfield_palette_free(palette);
        }
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(mathfield_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
