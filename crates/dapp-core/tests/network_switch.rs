//! Add/switch network dialog against the scripted wallet.

use dapp_core::network::CHAIN_NOT_FOUND_MESSAGE;
use dapp_core::{DappController, NetworkForm, Notice};
use dapp_testing::{Call, Method, MockEnvironment};
use dapp_traits::{AddChainParams, NativeCurrency, ProviderError};

fn mainnet_form() -> NetworkForm {
    NetworkForm {
        chain_name: "Ethereum".into(),
        rpc_url: "https://mainnet.infura.io/v3/key".into(),
        chain_id: "1".into(),
        currency_decimals: "18".into(),
        currency_symbol: "ETH".into(),
    }
}

async fn app_with_dialog(env: &MockEnvironment, form: NetworkForm) -> DappController<MockEnvironment> {
    let mut app = DappController::new(env.clone());
    app.connect().await;
    app.open_network_dialog();
    *app.network_form_mut() = form;
    env.clear_calls();
    app
}

#[tokio::test]
async fn test_unknown_chain_is_added_then_refreshed() {
    let env = MockEnvironment::new()
        .on_chain(11_155_111, "sepolia")
        .with_only_current_chain();
    let mut app = app_with_dialog(&env, mainnet_form()).await;
    assert!(!env.knows_chain(1));

    assert!(app.switch_network().await);

    let calls = env.calls();
    assert_eq!(calls[0], Call::SwitchChain("0x1".into()));
    assert_eq!(
        calls[1],
        Call::AddChain(AddChainParams {
            chain_id: "0x1".into(),
            chain_name: "Ethereum".into(),
            rpc_urls: vec!["https://mainnet.infura.io/v3/key".into()],
            native_currency: NativeCurrency {
                symbol: "ETH".into(),
                decimals: 18,
            },
        })
    );
    assert!(calls.contains(&Call::Network));
    assert!(!app.network().open);
    assert!(!app.network().validation_error);
    assert_eq!(app.session().chain().map(|c| c.chain_id), Some(1));
}

#[tokio::test]
async fn test_known_chain_switches_directly() {
    let env = MockEnvironment::new();
    let form = NetworkForm {
        chain_name: "Sepolia".into(),
        rpc_url: "https://rpc.sepolia.org".into(),
        chain_id: "0xaa36a7".into(),
        currency_decimals: "18".into(),
        currency_symbol: "SEP".into(),
    };
    let mut app = app_with_dialog(&env, form).await;

    assert!(app.switch_network().await);

    assert!(env.calls_to(Method::AddChain).is_empty());
    assert_eq!(env.current_chain_id(), 11_155_111);
    let chain = app.session().chain().unwrap();
    assert_eq!(chain.name, "sepolia");
    assert!(chain.ens_address.is_none());
    assert!(!app.network().open);
}

#[tokio::test]
async fn test_invalid_params_on_switch_flags_dialog() {
    let env = MockEnvironment::new();
    env.fail_next(Method::SwitchChain, ProviderError::invalid_params("bad chain"));
    let mut app = app_with_dialog(&env, mainnet_form()).await;

    assert!(!app.switch_network().await);

    assert!(app.network().open);
    assert!(app.network().validation_error);
    assert_eq!(app.network().error_message(), Some(CHAIN_NOT_FOUND_MESSAGE));
    assert_eq!(env.calls(), vec![Call::SwitchChain("0x1".into())]);
}

#[tokio::test]
async fn test_invalid_params_on_add_flags_dialog() {
    let env = MockEnvironment::new()
        .on_chain(11_155_111, "sepolia")
        .with_only_current_chain();
    env.fail_next(Method::AddChain, ProviderError::invalid_params("rpc mismatch"));
    let mut app = app_with_dialog(&env, mainnet_form()).await;

    assert!(!app.switch_network().await);

    assert!(app.network().open);
    assert!(app.network().validation_error);
    assert!(env.calls_to(Method::Network).is_empty());
    assert_eq!(env.current_chain_id(), 11_155_111);
}

#[tokio::test]
async fn test_rejected_switch_notifies_without_flag() {
    let env = MockEnvironment::new();
    env.fail_next(Method::SwitchChain, ProviderError::user_rejected());
    let mut app = app_with_dialog(&env, mainnet_form()).await;

    assert!(!app.switch_network().await);

    assert!(app.network().open);
    assert!(!app.network().validation_error);
    assert!(matches!(app.notices(), [Notice::NetworkSwitchFailed(_)]));
    assert!(env.calls_to(Method::AddChain).is_empty());
}

#[tokio::test]
async fn test_rejected_add_notifies_without_flag() {
    let env = MockEnvironment::new()
        .on_chain(11_155_111, "sepolia")
        .with_only_current_chain();
    env.fail_next(Method::AddChain, ProviderError::user_rejected());
    let mut app = app_with_dialog(&env, mainnet_form()).await;

    assert!(!app.switch_network().await);

    assert!(app.network().open);
    assert!(!app.network().validation_error);
    assert!(matches!(app.notices(), [Notice::NetworkSwitchFailed(_)]));
}

#[tokio::test]
async fn test_closed_gate_makes_no_call() {
    let env = MockEnvironment::new();
    let mut form = mainnet_form();
    form.rpc_url = "mainnet".into();
    let mut app = app_with_dialog(&env, form).await;

    assert!(!app.can_switch_network());
    assert!(!app.switch_network().await);
    assert!(env.calls().is_empty());
}

#[tokio::test]
async fn test_unparsable_inputs_flag_without_wallet_call() {
    let env = MockEnvironment::new();

    let mut form = mainnet_form();
    form.currency_decimals = "ab".into();
    let mut app = app_with_dialog(&env, form).await;
    assert!(app.can_switch_network());
    assert!(!app.switch_network().await);
    assert!(app.network().validation_error);

    let mut form = mainnet_form();
    form.chain_id = "polygon".into();
    *app.network_form_mut() = form;
    assert!(!app.switch_network().await);
    assert!(app.network().validation_error);

    assert!(env.calls().is_empty());
}

#[tokio::test]
async fn test_new_attempt_and_reopen_clear_flag() {
    let env = MockEnvironment::new();
    env.fail_next(Method::SwitchChain, ProviderError::invalid_params("bad"));
    let mut app = app_with_dialog(&env, mainnet_form()).await;
    app.switch_network().await;
    assert!(app.network().validation_error);

    app.cancel_network_dialog();
    app.open_network_dialog();
    assert!(!app.network().validation_error);
    assert_eq!(app.network().form, mainnet_form());

    env.fail_next(Method::SwitchChain, ProviderError::invalid_params("bad"));
    app.switch_network().await;
    assert!(app.network().validation_error);
    assert!(app.switch_network().await);
    assert!(!app.network().validation_error);
}

#[tokio::test]
async fn test_switch_without_wallet() {
    let env = MockEnvironment::not_installed();
    let mut app = DappController::new(env);
    *app.network_form_mut() = mainnet_form();

    assert!(!app.switch_network().await);
    assert_eq!(app.notices(), &[Notice::WalletNotInstalled]);
}

#[tokio::test]
async fn test_switch_while_disconnected_skips_refresh() {
    let env = MockEnvironment::new()
        .on_chain(11_155_111, "sepolia");
    let mut app = DappController::new(env.clone());
    app.open_network_dialog();
    *app.network_form_mut() = mainnet_form();

    assert!(app.switch_network().await);
    assert_eq!(env.calls(), vec![Call::SwitchChain("0x1".into())]);
    assert_eq!(env.current_chain_id(), 1);
    assert!(!app.network().open);
}

#[tokio::test]
async fn test_in_flight_switch_blocks_second_attempt() {
    let env = MockEnvironment::new();
    let mut app = app_with_dialog(&env, mainnet_form()).await;

    let request = app.prepare_switch().unwrap();
    assert!(app.network().in_flight);
    assert!(app.prepare_switch().is_none());

    let outcome = dapp_core::switch::run_switch(&request).await;
    assert!(app.finish_switch(outcome));
    assert!(!app.network().in_flight);
}
