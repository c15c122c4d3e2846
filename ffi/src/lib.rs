//! C-ABI wrapper around `pets-core`.
//!
//! # Overview
//! Exposes the pets API through `extern "C"` functions so a native host
//! (the mobile presentation layer) can build requests, perform the HTTP
//! round-trip with its own networking stack, and hand the responses back
//! for parsing, without linking an async runtime.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiPetsResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `pets_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use pets_core::{HttpResponse, UploadRequest, UploadTarget};

use types::*;

/// Borrow a C string as UTF-8; invalid UTF-8 reads as empty.
unsafe fn str_arg<'a>(s: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(s) }.to_str().unwrap_or("")
}

/// Borrow a C string as UTF-8, or `None` if it is not valid UTF-8.
unsafe fn strict_str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `PetsClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `pets_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn pets_client_new(base_url: *const c_char) -> *mut FfiPetsClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { str_arg(base_url) };
        let client = pets_core::PetsClient::new(url);
        Box::into_raw(Box::new(FfiPetsClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `pets_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn pets_client_free(client: *mut FfiPetsClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request listing all pets.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `pets_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn pets_build_list_pets(client: *const FfiPetsClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_pets())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for a fresh upload target.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn pets_build_request_upload_target(
    client: *const FfiPetsClient,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_request_upload_target())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the multipart upload of `image_len` bytes at `image` to
/// `target_url`.
///
/// `image` may be null only when `image_len` is 0. Returns null if any other
/// argument is null, if a string argument is not valid UTF-8, if `app_id` is
/// empty, or if `target_url` is not an absolute http(s) URL. Use each target
/// for one upload only.
#[unsafe(no_mangle)]
pub extern "C" fn pets_build_upload_image(
    client: *const FfiPetsClient,
    target_url: *const c_char,
    app_id: *const c_char,
    original_url: *const c_char,
    image: *const u8,
    image_len: usize,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || target_url.is_null() || app_id.is_null() || original_url.is_null() {
            return std::ptr::null_mut();
        }
        if image.is_null() && image_len > 0 {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let image = if image_len == 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(image, image_len) }.to_vec()
        };
        let args = unsafe {
            (
                strict_str_arg(target_url),
                strict_str_arg(app_id),
                strict_str_arg(original_url),
            )
        };
        let (Some(target_url), Some(app_id), Some(original_url)) = args else {
            return std::ptr::null_mut();
        };
        let target = UploadTarget::new(target_url);
        let request = UploadRequest::new(app_id, original_url, image);
        match client.inner.build_upload_image(target, &request) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Copy an `FfiHttpResponse` into a core `HttpResponse`.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() || resp.body_len == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(resp.body, resp.body_len) }.to_vec()
    };
    HttpResponse::new(resp.status, body)
}

/// Parse the response to a list-pets request.
///
/// Returns a result with `data_tag = PetList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn pets_parse_list_pets(
    client: *const FfiPetsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPetsResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPetsResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPetsResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = ffi_response_to_core(unsafe { &*response });
        match client.inner.parse_list_pets(resp) {
            Ok(pets) => FfiPetsResult::ok_pet_list(pets),
            Err(e) => FfiPetsResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPetsResult::panic("panic in pets_parse_list_pets"))
}

/// Parse the response to an upload-target request.
///
/// Returns a result with `data_tag = UploadTarget` on success.
#[unsafe(no_mangle)]
pub extern "C" fn pets_parse_upload_target(
    client: *const FfiPetsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPetsResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPetsResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPetsResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = ffi_response_to_core(unsafe { &*response });
        match client.inner.parse_upload_target(resp) {
            Ok(target) => FfiPetsResult::ok_upload_target(target),
            Err(e) => FfiPetsResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPetsResult::panic("panic in pets_parse_upload_target"))
}

/// Parse the response to an upload.
///
/// Returns a result with `data_tag = None` on any 2xx status.
#[unsafe(no_mangle)]
pub extern "C" fn pets_parse_upload_image(
    client: *const FfiPetsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPetsResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPetsResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPetsResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = ffi_response_to_core(unsafe { &*response });
        match client.inner.parse_upload_image(resp) {
            Ok(_) => FfiPetsResult::ok_empty(),
            Err(e) => FfiPetsResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPetsResult::panic("panic in pets_parse_upload_image"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `pets_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn pets_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            drop_c_string(req.url);
            for h in from_raw_parts(req.headers, req.headers_len) {
                drop_c_string(h.key);
                drop_c_string(h.value);
            }
            drop(from_raw_parts(req.body, req.body_len));
        }
    });
}

/// Free an `FfiPetsResult` returned by any `pets_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn pets_free_result(result: *mut FfiPetsResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        unsafe { drop_c_string(result.error_message) };
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::PetList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiPetList) };
                for pet in unsafe { from_raw_parts(list.items, list.len) } {
                    unsafe { pet.free_fields() };
                }
            }
            FfiDataTag::UploadTarget => unsafe { drop_c_string(result.data as *mut c_char) },
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn pets_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { drop_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    const BASE: &str = "http://localhost:3000";

    fn new_client() -> *mut FfiPetsClient {
        let url = CString::new(BASE).unwrap();
        let client = pets_client_new(url.as_ptr());
        assert!(!client.is_null());
        client
    }

    fn response(status: u16, body: &[u8]) -> FfiHttpResponse {
        FfiHttpResponse {
            status,
            body: body.as_ptr(),
            body_len: body.len(),
        }
    }

    fn c_str<'a>(p: *const c_char) -> &'a str {
        unsafe { CStr::from_ptr(p) }.to_str().unwrap()
    }

    fn build_upload(
        client: *const FfiPetsClient,
        target: &str,
        app_id: &str,
        image: &[u8],
    ) -> *mut FfiHttpRequest {
        let target = CString::new(target).unwrap();
        let app_id = CString::new(app_id).unwrap();
        let original = CString::new("orig").unwrap();
        pets_build_upload_image(
            client,
            target.as_ptr(),
            app_id.as_ptr(),
            original.as_ptr(),
            image.as_ptr(),
            image.len(),
        )
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        pets_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        assert!(pets_client_new(std::ptr::null()).is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        pets_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_list_pets_returns_correct_request() {
        let client = new_client();
        let req = pets_build_list_pets(client);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert_eq!(req_ref.method, FfiHttpMethod::Get);
        assert_eq!(c_str(req_ref.url), "http://localhost:3000/pets");
        assert!(req_ref.body.is_null());
        assert_eq!(req_ref.body_len, 0);
        assert_eq!(req_ref.headers_len, 0);

        pets_free_request(req);
        pets_client_free(client);
    }

    #[test]
    fn build_list_pets_null_client_returns_null() {
        assert!(pets_build_list_pets(std::ptr::null()).is_null());
    }

    #[test]
    fn build_request_upload_target_returns_correct_request() {
        let client = new_client();
        let req = pets_build_request_upload_target(client);
        let req_ref = unsafe { &*req };
        assert_eq!(req_ref.method, FfiHttpMethod::Get);
        assert_eq!(c_str(req_ref.url), "http://localhost:3000/upload");
        pets_free_request(req);
        pets_client_free(client);
    }

    #[test]
    fn build_upload_image_produces_multipart_post() {
        let client = new_client();
        let image = [0xffu8, 0xd8, 0x00, 0xd9];
        let req = build_upload(client, "http://localhost:3000/upload/t1", "me", &image);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert_eq!(req_ref.method, FfiHttpMethod::Post);
        assert_eq!(c_str(req_ref.url), "http://localhost:3000/upload/t1");
        assert_eq!(req_ref.headers_len, 1);
        let header = unsafe { &*req_ref.headers };
        assert_eq!(c_str(header.key), "content-type");
        assert!(c_str(header.value).starts_with("multipart/form-data; boundary="));

        let body = unsafe { std::slice::from_raw_parts(req_ref.body, req_ref.body_len) };
        assert!(body.windows(image.len()).any(|w| w == image));
        let text = String::from_utf8_lossy(body);
        assert!(text.contains("filename=\"image.jpg\""));

        pets_free_request(req);
        pets_client_free(client);
    }

    #[test]
    fn build_upload_image_empty_app_id_returns_null() {
        let client = new_client();
        let req = build_upload(client, "http://localhost:3000/upload/t1", "", b"x");
        assert!(req.is_null());
        pets_client_free(client);
    }

    #[test]
    fn build_upload_image_bad_target_returns_null() {
        let client = new_client();
        let req = build_upload(client, "not a url", "me", b"x");
        assert!(req.is_null());
        pets_client_free(client);
    }

    #[test]
    fn build_upload_image_invalid_utf8_original_returns_null() {
        let client = new_client();
        let target = CString::new("http://localhost:3000/upload/t1").unwrap();
        let app_id = CString::new("me").unwrap();
        let original = CString::new(vec![b'a', 0xff, b'b']).unwrap();
        let image = [1u8, 2, 3];
        let req = pets_build_upload_image(
            client,
            target.as_ptr(),
            app_id.as_ptr(),
            original.as_ptr(),
            image.as_ptr(),
            image.len(),
        );
        assert!(req.is_null());
        pets_client_free(client);
    }

    #[test]
    fn build_upload_image_echoes_original_verbatim() {
        let client = new_client();
        let target = CString::new("http://localhost:3000/upload/t1").unwrap();
        let app_id = CString::new("me").unwrap();
        let original = CString::new("https://x/y?z=ü").unwrap();
        let req = pets_build_upload_image(
            client,
            target.as_ptr(),
            app_id.as_ptr(),
            original.as_ptr(),
            std::ptr::null(),
            0,
        );
        assert!(!req.is_null());
        let req_ref = unsafe { &*req };
        let body = unsafe { std::slice::from_raw_parts(req_ref.body, req_ref.body_len) };
        let text = String::from_utf8_lossy(body);
        assert!(text.contains("name=\"original\"\r\n\r\nhttps://x/y?z=ü\r\n"));
        pets_free_request(req);
        pets_client_free(client);
    }

    #[test]
    fn build_upload_image_null_image_with_length_returns_null() {
        let client = new_client();
        let target = CString::new("http://localhost:3000/upload/t1").unwrap();
        let app_id = CString::new("me").unwrap();
        let req = pets_build_upload_image(
            client,
            target.as_ptr(),
            app_id.as_ptr(),
            target.as_ptr(),
            std::ptr::null(),
            4,
        );
        assert!(req.is_null());
        pets_client_free(client);
    }

    #[test]
    fn parse_list_pets_two_items() {
        let client = new_client();
        let body = br#"[{"title":"Rex","description":"dog","url":"https://i/rex.jpg","created":"a"},
                        {"title":"Mia","description":"cat","url":"https://i/mia.jpg","created":"b"}]"#;
        let resp = response(200, body);
        let result = pets_parse_list_pets(client, &resp);
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Ok);
        assert_eq!(result_ref.data_tag, FfiDataTag::PetList);

        let list = unsafe { &*(result_ref.data as *const FfiPetList) };
        assert_eq!(list.len, 2);
        let items = unsafe { std::slice::from_raw_parts(list.items, list.len) };
        assert_eq!(c_str(items[0].title), "Rex");
        assert_eq!(c_str(items[1].description), "cat");
        assert_eq!(c_str(items[1].image_url), "https://i/mia.jpg");

        pets_free_result(result);
        pets_client_free(client);
    }

    #[test]
    fn parse_list_pets_empty() {
        let client = new_client();
        let resp = response(200, b"[]");
        let result = pets_parse_list_pets(client, &resp);
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Ok);
        let list = unsafe { &*(result_ref.data as *const FfiPetList) };
        assert_eq!(list.len, 0);
        assert!(list.items.is_null());
        pets_free_result(result);
        pets_client_free(client);
    }

    #[test]
    fn parse_list_pets_missing_field_is_decode_error() {
        let client = new_client();
        let resp = response(200, br#"[{"title":"Rex"}]"#);
        let result = pets_parse_list_pets(client, &resp);
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Decode);
        assert!(result_ref.data.is_null());
        assert!(!result_ref.error_message.is_null());
        pets_free_result(result);
        pets_client_free(client);
    }

    #[test]
    fn parse_upload_target_success() {
        let client = new_client();
        let resp = response(200, br#"{"url":"https://x/y"}"#);
        let result = pets_parse_upload_target(client, &resp);
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Ok);
        assert_eq!(result_ref.data_tag, FfiDataTag::UploadTarget);
        assert_eq!(c_str(result_ref.data as *const c_char), "https://x/y");
        pets_free_result(result);
        pets_client_free(client);
    }

    #[test]
    fn parse_upload_target_missing_url_is_protocol_error() {
        let client = new_client();
        let resp = response(200, b"{}");
        let result = pets_parse_upload_target(client, &resp);
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Protocol);
        assert!(c_str(result_ref.error_message).contains("invalid response from the server"));
        pets_free_result(result);
        pets_client_free(client);
    }

    #[test]
    fn parse_upload_image_created() {
        let client = new_client();
        let resp = response(201, b"");
        let result = pets_parse_upload_image(client, &resp);
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Ok);
        assert_eq!(result_ref.data_tag, FfiDataTag::None);
        pets_free_result(result);
        pets_client_free(client);
    }

    #[test]
    fn parse_upload_image_forbidden() {
        let client = new_client();
        let resp = response(403, b"forbidden");
        let result = pets_parse_upload_image(client, &resp);
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Server);
        assert_eq!(result_ref.http_status, 403);
        pets_free_result(result);
        pets_client_free(client);
    }

    #[test]
    fn parse_null_body_reads_as_empty() {
        let client = new_client();
        let resp = FfiHttpResponse {
            status: 204,
            body: std::ptr::null(),
            body_len: 0,
        };
        let result = pets_parse_upload_image(client, &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Ok);
        pets_free_result(result);
        pets_client_free(client);
    }

    #[test]
    fn parse_null_client_returns_null_arg() {
        let resp = response(200, b"[]");
        let result = pets_parse_list_pets(std::ptr::null(), &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        pets_free_result(result);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let client = new_client();
        let result = pets_parse_upload_target(client, std::ptr::null());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::NullArg);
        assert_eq!(c_str(result_ref.error_message), "null argument: response");
        pets_free_result(result);
        pets_client_free(client);
    }

    #[test]
    fn free_request_null_is_safe() {
        pets_free_request(std::ptr::null_mut());
    }

    #[test]
    fn free_result_null_is_safe() {
        pets_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        pets_free_string(std::ptr::null_mut());
    }
}
