//! Connect, refresh and disconnect against the scripted wallet.

use dapp_core::{DappController, Notice};
use dapp_testing::{Call, Method, MockEnvironment};
use dapp_traits::{ProviderError, U256};

#[tokio::test]
async fn test_connect_without_wallet() {
    let env = MockEnvironment::not_installed();
    let mut app = DappController::new(env.clone());

    assert!(!app.connect().await);
    assert_eq!(app.notices(), &[Notice::WalletNotInstalled]);
    assert!(!app.session().is_connected());
    assert!(env.calls().is_empty());
}

#[tokio::test]
async fn test_connect_populates_session() {
    let env = MockEnvironment::new().with_nonce(7);
    let mut app = DappController::new(env.clone());

    assert!(app.connect().await);

    let session = app.session();
    assert_eq!(session.account(), Some(env.account()));
    assert!(session.signer().is_some());
    assert_eq!(session.balance(), Some("2.0"));
    let chain = session.chain().unwrap();
    assert_eq!(chain.chain_id, 1);
    assert_eq!(chain.name, "homestead");
    assert!(chain.ens_address.is_some());
    assert_eq!(session.gas_price(), Some("20.0"));
    assert_eq!(session.max_fee_per_gas(), Some("40.0"));
    assert_eq!(session.max_priority_fee_per_gas(), Some("1.5"));
    assert_eq!(app.form().nonce(), "7");

    let account = env.account();
    assert_eq!(
        env.calls(),
        vec![
            Call::RequestAccounts,
            Call::Signer,
            Call::Balance(account),
            Call::TransactionCount(account),
            Call::Network,
            Call::FeeData,
        ]
    );
}

#[tokio::test]
async fn test_typed_nonce_is_kept() {
    let env = MockEnvironment::new().with_nonce(7);
    let mut app = DappController::new(env.clone());
    app.form_mut().set_nonce("12");

    app.connect().await;

    assert_eq!(app.form().nonce(), "12");
    assert!(env.calls_to(Method::TransactionCount).is_empty());
}

#[tokio::test]
async fn test_rejected_account_request() {
    let env = MockEnvironment::new();
    env.fail_next(Method::RequestAccounts, ProviderError::user_rejected());
    let mut app = DappController::new(env.clone());

    assert!(!app.connect().await);
    assert!(!app.session().is_connected());
    assert!(app.notices().is_empty());
    assert_eq!(env.calls(), vec![Call::RequestAccounts]);
}

#[tokio::test]
async fn test_no_accounts_returned() {
    let env = MockEnvironment::new().with_accounts(vec![]);
    let mut app = DappController::new(env);

    assert!(!app.connect().await);
    assert!(!app.session().is_connected());
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_state() {
    let env = MockEnvironment::new();
    let mut app = DappController::new(env.clone());
    app.connect().await;

    env.clone().with_balance(U256::from(5_000_000_000_000_000_000u128));
    env.fail_next(Method::Network, ProviderError::other("network down"));

    assert!(!app.refresh().await);
    assert_eq!(app.session().balance(), Some("2.0"));
    assert_eq!(app.session().chain().map(|c| c.chain_id), Some(1));

    assert!(app.refresh().await);
    assert_eq!(app.session().balance(), Some("5.0"));
}

#[tokio::test]
async fn test_unreported_fees_keep_previous_values() {
    let env = MockEnvironment::new();
    let mut app = DappController::new(env.clone());
    app.connect().await;

    env.clone().with_fees(dapp_traits::FeeData {
        gas_price: Some(25_000_000_000),
        max_fee_per_gas: None,
        max_priority_fee_per_gas: None,
    });
    app.refresh().await;

    assert_eq!(app.session().gas_price(), Some("25.0"));
    assert_eq!(app.session().max_fee_per_gas(), Some("40.0"));
}

#[tokio::test]
async fn test_disconnect_resets_everything() {
    let env = MockEnvironment::new().with_nonce(3);
    let mut app = DappController::new(env.clone());
    app.connect().await;
    let epoch = app.session().epoch();
    let calls = env.calls().len();

    app.disconnect();

    let session = app.session();
    assert!(!session.is_connected());
    assert!(session.provider().is_none());
    assert!(session.signer().is_none());
    assert!(session.balance().is_none());
    assert!(session.chain().is_none());
    assert!(session.gas_price().is_none());
    assert!(session.max_fee_per_gas().is_none());
    assert!(session.max_priority_fee_per_gas().is_none());
    assert_eq!(session.epoch(), epoch + 1);
    assert_eq!(app.form().nonce(), "");
    assert!(!app.is_loading());
    assert!(!app.has_transaction_error());
    assert_eq!(env.calls().len(), calls);
}

#[tokio::test]
async fn test_refresh_from_previous_session_is_dropped() {
    let env = MockEnvironment::new();
    let mut app = DappController::new(env.clone());
    app.connect().await;

    let request = app.prepare_refresh().unwrap();
    app.disconnect();
    let result = dapp_core::session::fetch_session(&request).await;

    assert!(result.is_ok());
    assert!(!app.finish_refresh(request.epoch, result));
    assert!(app.session().balance().is_none());
    assert_eq!(app.form().nonce(), "");
}

#[tokio::test]
async fn test_refresh_without_account_does_nothing() {
    let env = MockEnvironment::new();
    let mut app = DappController::new(env.clone());

    assert!(app.prepare_refresh().is_none());
    assert!(!app.refresh().await);
    assert!(env.calls().is_empty());
}
