//! The page object handed to JavaScript.

use std::cell::RefCell;
use std::rc::Rc;

use dapp_core::session::fetch_session;
use dapp_core::switch::run_switch;
use dapp_core::transfer::execute_transfer;
use dapp_core::{DappController, NetworkForm};
use dapp_traits::WalletProvider;
use js_sys::{Function, Promise};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::eip1193::InjectedEnvironment;

type Controller = DappController<InjectedEnvironment>;

struct Shared {
    controller: RefCell<Controller>,
    listener: RefCell<Option<Function>>,
}

impl Shared {
    /// Shows pending notices and tells the page to re-render.
    fn publish(&self) {
        let notices = self.controller.borrow_mut().take_notices();
        for notice in notices {
            let message = notice.to_string();
            web_sys::console::warn_1(&JsValue::from_str(&message));
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.alert_with_message(&message) {
                    web_sys::console::error_1(&e);
                }
            }
        }

        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            // the listener may call back into the app
            let view = view_value(&self.controller.borrow());
            match view {
                Ok(view) => {
                    if let Err(e) = listener.call1(&JsValue::NULL, &view) {
                        web_sys::console::error_1(&e);
                    }
                }
                Err(e) => web_sys::console::error_1(&e),
            }
        }
    }

    fn edit(&self, change: impl FnOnce(&mut Controller)) {
        change(&mut self.controller.borrow_mut());
        self.publish();
    }
}

fn view_value(controller: &Controller) -> Result<JsValue, JsValue> {
    controller
        .view()
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

async fn connect(app: &Shared) -> bool {
    let provider = app.controller.borrow_mut().prepare_connect();
    let Some(provider) = provider else {
        return false;
    };
    let accounts = provider.request_accounts().await;
    let connected = app.controller.borrow_mut().finish_connect(provider, accounts);
    app.publish();
    if connected {
        refresh(app).await;
    }
    connected
}

async fn refresh(app: &Shared) -> bool {
    let request = app.controller.borrow().prepare_refresh();
    let Some(request) = request else {
        return false;
    };
    let result = fetch_session(&request).await;
    app.controller
        .borrow_mut()
        .finish_refresh(request.epoch, result)
}

async fn send_transaction(app: &Shared) -> bool {
    let ticket = app.controller.borrow_mut().prepare_transfer();
    let Some(ticket) = ticket else {
        return false;
    };
    // loading state
    app.publish();
    let result = execute_transfer(&ticket).await;
    app.controller
        .borrow_mut()
        .finish_transfer(ticket.epoch, result)
}

async fn switch_network(app: &Shared) -> bool {
    let request = app.controller.borrow_mut().prepare_switch();
    let Some(request) = request else {
        return false;
    };
    app.publish();
    let outcome = run_switch(&request).await;
    let switched = app.controller.borrow_mut().finish_switch(outcome);
    if switched {
        refresh(app).await;
    }
    switched
}

/// The transfer dApp, bound to the page's injected wallet.
///
/// Every method that talks to the wallet returns a promise resolving to a
/// boolean success flag. Call [`DappApp::view`] (or register a listener with
/// [`DappApp::on_change`]) to render.
#[wasm_bindgen]
pub struct DappApp {
    inner: Rc<Shared>,
}

#[wasm_bindgen]
impl DappApp {
    /// Creates a disconnected app
    #[wasm_bindgen(constructor)]
    pub fn new() -> DappApp {
        DappApp {
            inner: Rc::new(Shared {
                controller: RefCell::new(DappController::new(InjectedEnvironment)),
                listener: RefCell::new(None),
            }),
        }
    }

    /// Registers a callback invoked with the serialised view after every state change.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, listener: Function) {
        *self.inner.listener.borrow_mut() = Some(listener);
    }

    /// Current page state as a plain JS object
    #[wasm_bindgen]
    pub fn view(&self) -> Result<JsValue, JsValue> {
        view_value(&self.inner.controller.borrow())
    }

    // Session

    /// Requests account access and loads the account state
    #[wasm_bindgen]
    pub fn connect(&self) -> Promise {
        let app = Rc::clone(&self.inner);
        future_to_promise(async move {
            let connected = connect(&app).await;
            app.publish();
            Ok(JsValue::from_bool(connected))
        })
    }

    /// Forgets the connected account
    #[wasm_bindgen]
    pub fn disconnect(&self) {
        self.inner.edit(|app| app.disconnect());
    }

    /// Re-reads balance, nonce, network and fees
    #[wasm_bindgen]
    pub fn refresh(&self) -> Promise {
        let app = Rc::clone(&self.inner);
        future_to_promise(async move {
            let refreshed = refresh(&app).await;
            app.publish();
            Ok(JsValue::from_bool(refreshed))
        })
    }

    // Transfer form

    #[wasm_bindgen(js_name = setTargetAddress)]
    pub fn set_target_address(&self, value: String) {
        self.inner.edit(|app| app.form_mut().set_target_address(value));
    }

    #[wasm_bindgen(js_name = setNonce)]
    pub fn set_nonce(&self, value: String) {
        self.inner.edit(|app| app.form_mut().set_nonce(value));
    }

    #[wasm_bindgen(js_name = setAmount)]
    pub fn set_amount(&self, value: String) {
        self.inner.edit(|app| app.form_mut().set_amount(value));
    }

    #[wasm_bindgen(js_name = setGasLimit)]
    pub fn set_gas_limit(&self, value: String) {
        self.inner.edit(|app| {
            app.form_mut().set_gas_limit(value);
        });
    }

    #[wasm_bindgen(js_name = setMaxPriorityFeePerGas)]
    pub fn set_max_priority_fee_per_gas(&self, value: String) {
        self.inner.edit(|app| {
            app.form_mut().set_max_priority_fee_per_gas(value);
        });
    }

    #[wasm_bindgen(js_name = setMaxFeePerGas)]
    pub fn set_max_fee_per_gas(&self, value: String) {
        self.inner.edit(|app| {
            app.form_mut().set_max_fee_per_gas(value);
        });
    }

    /// Flips advanced mode, clearing the advanced fields
    #[wasm_bindgen(js_name = toggleAdvanced)]
    pub fn toggle_advanced(&self) {
        self.inner.edit(|app| app.form_mut().toggle_advanced());
    }

    /// Clears target address and amount
    #[wasm_bindgen(js_name = clearForm)]
    pub fn clear_form(&self) {
        self.inner.edit(|app| app.form_mut().clear());
    }

    /// Sends the transfer and waits for one confirmation
    #[wasm_bindgen(js_name = sendTransaction)]
    pub fn send_transaction(&self) -> Promise {
        let app = Rc::clone(&self.inner);
        future_to_promise(async move {
            let sent = send_transaction(&app).await;
            app.publish();
            Ok(JsValue::from_bool(sent))
        })
    }

    // Network dialog

    #[wasm_bindgen(js_name = openNetworkDialog)]
    pub fn open_network_dialog(&self) {
        self.inner.edit(|app| app.open_network_dialog());
    }

    #[wasm_bindgen(js_name = cancelNetworkDialog)]
    pub fn cancel_network_dialog(&self) {
        self.inner.edit(|app| app.cancel_network_dialog());
    }

    /// Sets one dialog input. `field` is one of `chainName`, `rpcUrl`,
    /// `chainId`, `currencyDecimals` or `currencySymbol`.
    #[wasm_bindgen(js_name = setNetworkField)]
    pub fn set_network_field(&self, field: &str, value: String) -> Result<(), JsError> {
        let mut controller = self.inner.controller.borrow_mut();
        let slot = network_field(controller.network_form_mut(), field)
            .ok_or_else(|| JsError::new(&format!("Unknown network field: {field}")))?;
        *slot = value;
        drop(controller);
        self.inner.publish();
        Ok(())
    }

    /// Switches to the dialog's network, registering it with the wallet if needed
    #[wasm_bindgen(js_name = switchNetwork)]
    pub fn switch_network(&self) -> Promise {
        let app = Rc::clone(&self.inner);
        future_to_promise(async move {
            let switched = switch_network(&app).await;
            app.publish();
            Ok(JsValue::from_bool(switched))
        })
    }
}

impl Default for DappApp {
    fn default() -> Self {
        Self::new()
    }
}

fn network_field<'a>(form: &'a mut NetworkForm, field: &str) -> Option<&'a mut String> {
    match field {
        "chainName" => Some(&mut form.chain_name),
        "rpcUrl" => Some(&mut form.rpc_url),
        "chainId" => Some(&mut form.chain_id),
        "currencyDecimals" => Some(&mut form.currency_decimals),
        "currencySymbol" => Some(&mut form.currency_symbol),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_field_names() {
        let mut form = NetworkForm::default();
        for (field, value) in [
            ("chainName", "Polygon"),
            ("rpcUrl", "https://polygon-rpc.com"),
            ("chainId", "137"),
            ("currencyDecimals", "18"),
            ("currencySymbol", "POL"),
        ] {
            *network_field(&mut form, field).unwrap() = value.to_string();
        }
        assert!(form.can_confirm());
        assert_eq!(form.chain_id_hex().unwrap(), "0x89");
        assert!(network_field(&mut form, "chain_name").is_none());
    }
}
