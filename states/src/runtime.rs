use crate::CommandFuture;

/// Hands a command future to the platform executor.
///
/// Native builds need an entered Tokio runtime (the binary enters one before
/// starting eframe; `#[tokio::test]` provides one in tests). Returns `false`
/// when no executor is available and the future was dropped.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn spawn(future: CommandFuture) -> bool {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            drop(handle.spawn(future));
            true
        }
        Err(err) => {
            log::error!(
                target: "qrstudio::states",
                "no Tokio runtime entered, command dropped: {err}"
            );
            false
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn spawn(future: CommandFuture) -> bool {
    wasm_bindgen_futures::spawn_local(future);
    true
}
