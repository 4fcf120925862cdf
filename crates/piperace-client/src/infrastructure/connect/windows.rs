//! Windows implementation of the connection primitives.
//!
//! `WaitNamedPipeW` has no overlapped variant, so it runs on the blocking
//! thread pool.  The open goes through tokio's named pipe client options,
//! which surface the busy condition as a raw OS error code we translate
//! back into [`OpenError::Busy`].

use async_trait::async_trait;
use piperace_core::AttemptTimeout;
use tokio::net::windows::named_pipe::{ClientOptions, NamedPipeClient};
use windows_sys::Win32::Foundation::{
    GetLastError, ERROR_FILE_NOT_FOUND, ERROR_PIPE_BUSY, ERROR_SEM_TIMEOUT, ERROR_SUCCESS,
};
use windows_sys::Win32::System::Pipes::{WaitNamedPipeW, NMPWAIT_WAIT_FOREVER};

use super::{OpenError, PipeConnector, WaitError};

/// Connects to real named pipe endpoints.
#[derive(Debug, Default)]
pub struct NamedPipeConnector;

impl NamedPipeConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipeConnector for NamedPipeConnector {
    type Channel = NamedPipeClient;

    async fn wait_available(
        &mut self,
        path: &str,
        budget: AttemptTimeout,
    ) -> Result<(), WaitError> {
        let wide: Vec<u16> = path.encode_utf16().chain(std::iter::once(0)).collect();
        let wait_ms = match budget {
            AttemptTimeout::Infinite => NMPWAIT_WAIT_FOREVER,
            // Zero selects the server-side default wait, which is not what
            // an exhausted budget means; one millisecond is the shortest
            // honest wait.
            AttemptTimeout::Millis(ms) => ms.max(1),
        };

        tokio::task::spawn_blocking(move || {
            // SAFETY: `wide` is a NUL-terminated UTF-16 buffer owned by this
            // closure; WaitNamedPipeW only reads it for the duration of the
            // call.
            let ok = unsafe { WaitNamedPipeW(wide.as_ptr(), wait_ms) };
            if ok != 0 {
                return Ok(());
            }
            // SAFETY: reads the calling thread's last-error value; no
            // pointers involved.
            let code = unsafe { GetLastError() };
            match code {
                // The server has not created the endpoint yet.
                ERROR_FILE_NOT_FOUND => Err(WaitError::NotFound),
                // ERROR_SUCCESS is the "success with no wait" report; the
                // semaphore timeout is the ordinary expiry.
                ERROR_SUCCESS | ERROR_SEM_TIMEOUT => Err(WaitError::TimedOut),
                other => Err(WaitError::Os(other)),
            }
        })
        .await
        .expect("WaitNamedPipeW task panicked")
    }

    async fn open(&mut self, path: &str) -> Result<NamedPipeClient, OpenError> {
        match ClientOptions::new().open(path) {
            Ok(client) => Ok(client),
            // Another client connected between our wait and this open.
            Err(e) if e.raw_os_error() == Some(ERROR_PIPE_BUSY as i32) => Err(OpenError::Busy),
            Err(e) => Err(OpenError::Os(e.raw_os_error().unwrap_or(0) as u32)),
        }
    }
}
