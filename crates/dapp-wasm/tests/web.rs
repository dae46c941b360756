//! Browser tests without a wallet extension.
//!
//! Run with: `wasm-pack test --headless --firefox crates/dapp-wasm`
#![cfg(target_arch = "wasm32")]

use dapp_wasm::{has_wallet, DappApp};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn field(value: &JsValue, path: &[&str]) -> JsValue {
    path.iter().fold(value.clone(), |current, key| {
        js_sys::Reflect::get(&current, &JsValue::from_str(key)).unwrap()
    })
}

#[wasm_bindgen_test]
fn test_initial_view() {
    let app = DappApp::new();
    let view = app.view().unwrap();
    assert_eq!(
        field(&view, &["header", "label"]).as_string().as_deref(),
        Some("Connect Wallet")
    );
    assert!(field(&view, &["account"]).is_null());
    assert_eq!(field(&view, &["transfer", "sendEnabled"]).as_bool(), Some(false));
}

#[wasm_bindgen_test]
fn test_network_fields_drive_the_gate() {
    let app = DappApp::new();
    app.open_network_dialog();
    app.set_network_field("chainName", "Polygon".into()).unwrap();
    app.set_network_field("rpcUrl", "https://polygon-rpc.com".into()).unwrap();
    app.set_network_field("chainId", "137".into()).unwrap();
    app.set_network_field("currencyDecimals", "18".into()).unwrap();
    app.set_network_field("currencySymbol", "POL".into()).unwrap();
    assert!(app.set_network_field("gasToken", "x".into()).is_err());

    let view = app.view().unwrap();
    assert_eq!(field(&view, &["networkDialog", "open"]).as_bool(), Some(true));
    assert_eq!(
        field(&view, &["networkDialog", "switchEnabled"]).as_bool(),
        Some(true)
    );
}

#[wasm_bindgen_test]
async fn test_connect_without_wallet() {
    if has_wallet() {
        return;
    }
    let app = DappApp::new();
    let connected = JsFuture::from(app.connect()).await.unwrap();
    assert_eq!(connected.as_bool(), Some(false));
}
