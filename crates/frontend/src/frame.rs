use storymap_shared::flight::FrameScheduler;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Collects frame requests made during one animator call.
#[derive(Debug, Default)]
pub struct FrameRequest {
    requested: bool,
}

impl FrameRequest {
    pub fn requested(&self) -> bool {
        self.requested
    }
}

impl FrameScheduler for FrameRequest {
    fn request_frame(&mut self) {
        self.requested = true;
    }
}

/// Tracks whether a frame loop is already running, so a chapter change during
/// a flight does not start a second one.
#[derive(Debug, Default)]
pub struct FrameLoop {
    running: bool,
}

impl FrameLoop {
    /// Returns true when the caller should spawn the loop.
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.running, true)
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Milliseconds on the same clock as animation frame timestamps.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Wait for the next animation frame and return its timestamp.
pub async fn next_frame() -> f64 {
    let Some(window) = web_sys::window() else {
        return now_ms();
    };
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if window.request_animation_frame(&resolve).is_err() {
            let _ = resolve.call1(&JsValue::NULL, &JsValue::from_f64(now_ms()));
        }
    });
    match JsFuture::from(promise).await {
        Ok(ts) => ts.as_f64().unwrap_or_else(now_ms),
        Err(_) => now_ms(),
    }
}
