//! # dApp Core
//!
//! The logic behind a single-page transfer dApp: a wallet session that
//! mirrors the connected account, a network switch flow that falls back to
//! registering unknown chains, and a transfer flow that records confirmed
//! transactions in an in-memory history.
//!
//! Everything runs against a [`dapp_traits::ChainEnvironment`], so the same
//! [`DappController`] drives a browser page, a terminal front-end or a test.
//!
//! ## Quickstart
//!
//! ```ignore
//! use dapp_core::DappController;
//!
//! let mut app = DappController::new(environment);
//! app.connect().await;
//! app.form_mut().set_target_address("0x742d35cc6634c0532925a3b844bc9e7595f5ffb9");
//! app.form_mut().set_amount("0.25");
//! app.send_transaction().await;
//! println!("{}", app.view());
//! ```
//!
//! ## Flow phases
//!
//! Each asynchronous flow is split into a synchronous `prepare_*` step that
//! snapshots what it needs, a free `async` function that talks to the wallet
//! without touching controller state, and a synchronous `finish_*` step that
//! commits the result. The convenience `async` methods on the controller
//! chain the three; front-ends that keep the controller behind a `RefCell`
//! call the phases themselves so no borrow is held across an `.await`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod controller;
pub use controller::DappController;

mod error;
pub use error::DappError;

pub mod form;
pub use form::TransferForm;

pub mod history;
pub use history::{TransactionHistory, TransactionRecord};

pub mod network;
pub use network::{NetworkDialog, NetworkForm};

mod notice;
pub use notice::Notice;

pub mod session;
pub use session::{RefreshRequest, SessionSnapshot, WalletSession};

pub mod switch;
pub use switch::{SwitchOutcome, SwitchRequest, SwitchState};

pub mod transfer;
pub use transfer::TransferTicket;

pub mod view;
pub use view::DappView;

pub use dapp_traits;
