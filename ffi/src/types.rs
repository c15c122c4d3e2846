//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` for text, pointer + length for byte buffers and arrays, and
//! tagged enums with explicit discriminants. Conversion and release helpers
//! live here so `lib.rs` stays focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use pets_core::{ApiError, HttpMethod, Pet, UploadTarget};

/// Opaque handle to a `PetsClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiPetsClient {
    pub(crate) inner: pets_core::PetsClient,
}

/// Convert to an owned C string, dropping any interior NUL bytes.
pub(crate) fn into_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let c = CString::new(s).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    c.into_raw()
}

/// Release a C string produced by `into_c_string`. Null is ignored.
pub(crate) unsafe fn drop_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Hand a vector to C as a pointer + length pair (null when empty).
pub(crate) fn into_raw_parts<T>(items: Vec<T>) -> (*mut T, usize) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let boxed = items.into_boxed_slice();
    let len = boxed.len();
    (Box::into_raw(boxed) as *mut T, len)
}

/// Take back a buffer produced by `into_raw_parts`.
pub(crate) unsafe fn from_raw_parts<T>(ptr: *mut T, len: usize) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// `body` is binary (the upload carries image bytes) and is not
/// NUL-terminated; read exactly `body_len` bytes.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: usize,
    pub body: *mut u8,
    pub body_len: usize,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: pets_core::HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: into_c_string(k),
                value: into_c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(headers);
        let (body, body_len) = into_raw_parts(req.body.unwrap_or_default());

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: into_c_string(req.url),
            headers,
            headers_len,
            body,
            body_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller fills this in after executing a request and passes a
/// pointer to a `pets_parse_*` function. The FFI layer reads but does not
/// free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const u8,
    pub body_len: usize,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiPetsResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Network = 1,
    Decode = 2,
    Protocol = 3,
    Validation = 4,
    Server = 5,
    Panic = 6,
    NullArg = 7,
}

/// Tag that tells `pets_free_result` what `FfiPetsResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    /// `data` is a `FfiPetList*`.
    PetList = 1,
    /// `data` is a `char*` holding the upload target URL.
    UploadTarget = 2,
}

/// A single pet record exposed to C.
#[repr(C)]
pub struct FfiPet {
    pub title: *mut c_char,
    pub description: *mut c_char,
    pub image_url: *mut c_char,
    pub created: *mut c_char,
}

impl FfiPet {
    fn from_core(pet: Pet) -> Self {
        FfiPet {
            title: into_c_string(pet.title),
            description: into_c_string(pet.description),
            image_url: into_c_string(pet.image_url),
            created: into_c_string(pet.created),
        }
    }

    /// Free the C-string fields (but not the struct itself).
    pub(crate) unsafe fn free_fields(&self) {
        unsafe {
            drop_c_string(self.title);
            drop_c_string(self.description);
            drop_c_string(self.image_url);
            drop_c_string(self.created);
        }
    }
}

/// A list of pet records exposed to C, in server order.
#[repr(C)]
pub struct FfiPetList {
    pub items: *mut FfiPet,
    pub len: usize,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiPetsResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiPetsResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_tag: FfiDataTag,
        data: *mut c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiPetsResult {
            error_code,
            error_message,
            http_status,
            data_tag,
            data,
        }))
    }

    /// Build a success result carrying a `FfiPetList`.
    pub(crate) fn ok_pet_list(pets: Vec<Pet>) -> *mut Self {
        let items: Vec<FfiPet> = pets.into_iter().map(FfiPet::from_core).collect();
        let (items, len) = into_raw_parts(items);
        let list = Box::into_raw(Box::new(FfiPetList { items, len }));
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::PetList,
            list as *mut c_void,
        )
    }

    /// Build a success result carrying the target URL as a C string.
    pub(crate) fn ok_upload_target(target: UploadTarget) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::UploadTarget,
            into_c_string(target.into_string()) as *mut c_void,
        )
    }

    /// Build a success result with no data payload (e.g. upload).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = match &err {
            ApiError::Network(_) => FfiErrorCode::Network,
            ApiError::Decode(_) => FfiErrorCode::Decode,
            ApiError::Protocol(_) => FfiErrorCode::Protocol,
            ApiError::Validation(_) => FfiErrorCode::Validation,
            ApiError::Server { .. } => FfiErrorCode::Server,
        };
        Self::boxed(
            code,
            into_c_string(err.to_string()),
            err.status().unwrap_or(0),
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            into_c_string(format!("null argument: {name}")),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Panic,
            into_c_string(msg),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }
}
