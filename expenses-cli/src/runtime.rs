use anyhow::{Context, Result};
use std::future::Future;

/// Drive an async HTTP call to completion from synchronous pipeline code.
///
/// `main` runs under `#[tokio::main]`, and nesting `block_on` inside a live
/// runtime panics, so:
/// - if a runtime is already running: `block_in_place` + `Handle::block_on`
/// - otherwise: create a runtime and `block_on`
pub fn block_on<F: Future>(fut: F) -> Result<F::Output> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        Ok(tokio::task::block_in_place(|| handle.block_on(fut)))
    } else {
        let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
        Ok(rt.block_on(fut))
    }
}
