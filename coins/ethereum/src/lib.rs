//! # dApp Ethereum Library
//!
//! A local-key wallet that stands in for a browser extension when the dApp runs
//! outside a browser.
//!
//! This library uses the [alloy](https://github.com/alloy-rs/alloy) framework for Ethereum interactions.
//!
//! ## Quickstart Guide
//!
//! Use the [RpcEnvironment] struct as a good starting point. It holds one private key and a
//! registry of JSON-RPC endpoints, one per chain, and implements the same capability traits
//! as an injected wallet.
//!
//! ```
//! use dapp_ethereum::prelude::*;
//!
//! # fn ethereum() -> Result<(), dapp_ethereum::Error> {
//! let environment = RpcEnvironment::builder()
//!     .private_key("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
//!     .chain(KnownChain::new(31337, "Anvil", "http://127.0.0.1:8545"))
//!     .build()?;
//! assert!(environment.provider().is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ### Driving the dApp
//! The environment plugs straight into the controller.
//! ```no_run
//! # use dapp_ethereum::prelude::*;
//! # use dapp_core::DappController;
//! # async fn ethereum(environment: RpcEnvironment) {
//! let mut app = DappController::new(environment);
//! if app.connect().await {
//!     println!("{}", app.view());
//! }
//! # }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chains;
pub use chains::KnownChain;
mod error;
pub use error::Error;
mod rpc_environment;
pub use rpc_environment::{RpcEnvironment, RpcEnvironmentConfig, RpcPending, RpcProvider, RpcSigner};
pub use alloy;
pub mod prelude;

/// Re-export dapp-traits for convenience
pub use dapp_traits;
