//! FFI bindings for the library.
//!
//! Sessions are opaque pointers. Replies are delivered through a completion
//! callback that runs on a background runtime thread, so hosts must hop to
//! their UI thread themselves.

use std::ffi::{CStr, c_char, c_void};
use std::sync::LazyLock;

use little_chat_core::{ChatStage, SubmitError};
use little_chat_model::ErrorKind;
use little_chat_openai_model::{ChatModel, OpenAIConfigBuilder};
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};

use crate::{Session, SessionBuilder};

static TOKIO_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    RuntimeBuilder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()
        .unwrap()
});

/// Error codes returned by the C APIs.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    /// No error occurred.
    Ok = 0,
    /// Invalid parameters or strings.
    Invalid = 1,
    /// A reply is already pending.
    Busy = 2,
    /// The exchange was cancelled.
    Cancelled = 3,
    /// The endpoint is not a valid URL.
    InvalidEndpoint = 4,
    /// The request could not be encoded.
    Encoding = 5,
    /// The service could not be reached.
    Transport = 6,
    /// The service answered with a non-success status.
    Status = 7,
    /// The service is rate limited.
    RateLimitExceeded = 8,
    /// The response could not be decoded.
    Decoding = 9,
}

impl From<&SubmitError> for ErrorCode {
    fn from(err: &SubmitError) -> Self {
        match err {
            SubmitError::Busy => ErrorCode::Busy,
            SubmitError::Cancelled => ErrorCode::Cancelled,
            SubmitError::Model(err) => match err.kind() {
                ErrorKind::InvalidEndpoint => ErrorCode::InvalidEndpoint,
                ErrorKind::Encoding => ErrorCode::Encoding,
                ErrorKind::Transport => ErrorCode::Transport,
                ErrorKind::Status => ErrorCode::Status,
                ErrorKind::RateLimitExceeded => ErrorCode::RateLimitExceeded,
                ErrorKind::Decoding => ErrorCode::Decoding,
            },
        }
    }
}

/// Callbacks for the outcome of one submission.
///
/// Exactly one of `on_reply` and `on_error` is invoked, then `free` is
/// invoked. Note that callback functions and `user_info` are assumed to be
/// thread-safe and able to send across the thread boundaries.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct SubmitCallbacks {
    /// User-defined data to be passed to the callbacks.
    pub user_info: *mut c_void,
    /// Callback to handle the reply.
    ///
    /// Parameters:
    /// - `user_info`: The user-defined data.
    /// - `reply`: Reply string, not nul-terminated.
    /// - `reply_len`: Length of the reply string.
    pub on_reply: Option<unsafe extern "C" fn(*mut c_void, *const c_char, usize)>,
    /// Callback to handle a failure.
    ///
    /// Parameters:
    /// - `user_info`: The user-defined data.
    /// - `code`: One of the non-zero [`ErrorCode`] values.
    /// - `message`: Error description, not nul-terminated.
    /// - `message_len`: Length of the error description.
    pub on_error:
        Option<unsafe extern "C" fn(*mut c_void, u32, *const c_char, usize)>,
    /// Callback to free the user-defined data.
    pub free: Option<unsafe extern "C" fn(*mut c_void)>,
}

// SAFETY: `SubmitCallbacks` is guaranteed to be thread-safe by users.
unsafe impl Send for SubmitCallbacks {}
unsafe impl Sync for SubmitCallbacks {}

impl SubmitCallbacks {
    fn complete(self, result: Result<String, SubmitError>) {
        match result {
            Ok(reply) => {
                if let Some(on_reply) = self.on_reply {
                    // SAFETY: Assume the callback is valid.
                    unsafe {
                        on_reply(self.user_info, reply.as_ptr() as _, reply.len())
                    };
                }
            }
            Err(err) => {
                if let Some(on_error) = self.on_error {
                    let code = ErrorCode::from(&err) as u32;
                    let message = err.to_string();
                    // SAFETY: Assume the callback is valid.
                    unsafe {
                        on_error(
                            self.user_info,
                            code,
                            message.as_ptr() as _,
                            message.len(),
                        )
                    };
                }
            }
        }
        self.release();
    }

    fn release(self) {
        if let Some(free) = self.free {
            // SAFETY: Assume the callback is valid.
            unsafe { free(self.user_info) };
        }
    }
}

/// Reads a required UTF-8 string argument.
///
/// # Safety
///
/// `ptr` must be null or point to a nul-terminated string.
unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: Assume the caller has provided the valid pointer.
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Creates a session talking to an OpenAI-compatible service.
///
/// `out` will be set to a pointer to the session if the call succeeds. The
/// caller must free it with `lc_session_free`.
///
/// `base_url` and `system_prompt` may be null to use the defaults.
///
/// # Safety
///
/// Non-null strings passed to this function must contain a valid nul
/// terminator at the end of the string. `out` must be a valid pointer that
/// points to a pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lc_session_new_openai(
    out: *mut *mut c_void,
    api_key: *const c_char,
    base_url: *const c_char,
    model: *const c_char,
    system_prompt: *const c_char,
) -> ErrorCode {
    // SAFETY: Assume the caller has provided the valid pointers.
    let (api_key, model) = unsafe {
        let Some(api_key) = read_str(api_key) else {
            return ErrorCode::Invalid;
        };
        let Some(model) = read_str(model) else {
            return ErrorCode::Invalid;
        };
        (api_key, model)
    };

    let mut config_builder = OpenAIConfigBuilder::new();
    if !base_url.is_null() {
        // SAFETY: Checked for null above.
        let Some(base_url) = (unsafe { read_str(base_url) }) else {
            return ErrorCode::Invalid;
        };
        config_builder = config_builder.with_base_url(base_url);
    }

    let mut builder = SessionBuilder::with_openai(config_builder.build(), api_key)
        .with_model(ChatModel::from(model));
    if !system_prompt.is_null() {
        // SAFETY: Checked for null above.
        let Some(system_prompt) = (unsafe { read_str(system_prompt) }) else {
            return ErrorCode::Invalid;
        };
        builder = builder.with_system_prompt(system_prompt);
    }

    let session_ptr = Box::into_raw(Box::new(builder.build()));
    // SAFETY: Assume `out` is valid and properly aligned.
    unsafe {
        (out as *mut *mut Session).write(session_ptr);
    }

    ErrorCode::Ok
}

/// Frees a session. A pending submission is cancelled.
///
/// # Safety
///
/// `session` must be a valid pointer returned from `lc_session_new_openai`,
/// and must not be used after this call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lc_session_free(session: *mut c_void) {
    // SAFETY: Assume the caller has provided the valid pointer.
    let session = unsafe { Box::from_raw(session as *mut Session) };
    session.cancel();
}

/// Submits a message to the session.
///
/// The call returns immediately. The outcome is delivered through
/// `callbacks`, even when the session is busy. If `message` is not a valid
/// string, `Invalid` is returned and only `free` is invoked.
///
/// # Safety
///
/// `session` must be a valid pointer returned from `lc_session_new_openai`.
/// String pointed by `message` must contain a valid nul terminator at the end
/// of the string. `callbacks` must be a valid pointer to `SubmitCallbacks`
/// value, and all fields must be either valid pointers or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lc_session_submit(
    session: *mut c_void,
    message: *const c_char,
    callbacks: *const SubmitCallbacks,
) -> ErrorCode {
    // SAFETY: Assume the caller has provided the valid pointers.
    let callbacks = unsafe { *callbacks };
    let Some(message) = (unsafe { read_str(message) }) else {
        callbacks.release();
        return ErrorCode::Invalid;
    };
    // SAFETY: Assume the caller has provided the valid pointer.
    let session = unsafe { &*(session as *mut Session) };
    let message = message.to_owned();

    let session = session.clone();
    TOKIO_RUNTIME.spawn(async move {
        let result = session.send_message(&message).await;
        callbacks.complete(result);
    });

    ErrorCode::Ok
}

/// Cancels the pending submission. Returns `false` if there was none.
///
/// # Safety
///
/// `session` must be a valid pointer returned from `lc_session_new_openai`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lc_session_cancel(session: *mut c_void) -> bool {
    // SAFETY: Assume the caller has provided the valid pointer.
    let session = unsafe { &*(session as *mut Session) };
    session.cancel()
}

/// Clears the conversation, cancelling the pending submission if any.
///
/// # Safety
///
/// `session` must be a valid pointer returned from `lc_session_new_openai`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lc_session_reset(session: *mut c_void) {
    // SAFETY: Assume the caller has provided the valid pointer.
    let session = unsafe { &*(session as *mut Session) };
    session.reset();
}

/// Returns `true` if a submission is awaiting its reply.
///
/// # Safety
///
/// `session` must be a valid pointer returned from `lc_session_new_openai`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lc_session_is_busy(session: *mut c_void) -> bool {
    // SAFETY: Assume the caller has provided the valid pointer.
    let session = unsafe { &*(session as *mut Session) };
    session.stage() == ChatStage::AwaitingReply
}

/// Returns the number of messages in the transcript.
///
/// # Safety
///
/// `session` must be a valid pointer returned from `lc_session_new_openai`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lc_session_transcript_len(session: *mut c_void) -> usize {
    // SAFETY: Assume the caller has provided the valid pointer.
    let session = unsafe { &*(session as *mut Session) };
    session.transcript().len()
}
