//! # dApp WASM
//!
//! WebAssembly build of the transfer dApp, talking to the wallet extension
//! injected into the page (`window.ethereum`, EIP-1193).
//!
//! ## Usage in JavaScript/TypeScript
//!
//! ```javascript
//! import init, { DappApp } from 'dapp-wasm';
//!
//! async function main() {
//!     await init();
//!
//!     const app = new DappApp();
//!     app.onChange((view) => render(view));
//!
//!     if (await app.connect()) {
//!         app.setTargetAddress("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
//!         app.setAmount("0.01");
//!         await app.sendTransaction();
//!     }
//! }
//! ```

use wasm_bindgen::prelude::*;

mod app;
pub mod eip1193;

pub use app::DappApp;
pub use eip1193::{InjectedEnvironment, InjectedPending, InjectedProvider, InjectedSigner};

// Initialize panic hook for better error messages in browser console
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the WASM module. Runs automatically when the module is loaded.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();
}

/// Returns the dApp WASM version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Whether the page has a wallet extension
#[wasm_bindgen(js_name = hasWallet)]
pub fn has_wallet() -> bool {
    use dapp_traits::ChainEnvironment;
    InjectedEnvironment.provider().is_some()
}
