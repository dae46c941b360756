//! Network switch state machine.
//!
//! ```text
//! Idle -> SwitchRequested -> SwitchAccepted
//!                         -> AddRequested -> AddAccepted
//!                                         -> Failed
//!                         -> Failed
//! ```
//!
//! Every wallet error is classified by [`ProviderErrorKind`] and routed
//! through [`decide`], so each (stage, kind) pair has exactly one action.

use dapp_traits::{AddChainParams, ProviderError, ProviderErrorKind, ProviderResult, WalletProvider};
use tracing::{debug, info, warn};

/// Which wallet request produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchStage {
    /// `wallet_switchEthereumChain`
    Switch,
    /// `wallet_addEthereumChain`
    Add,
}

/// What the flow does with a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    /// Register the chain, then consider the switch done
    AddChain,
    /// Flag the dialog inputs as invalid
    FlagInvalidParams,
    /// Log and tell the user, leave the dialog as is
    Report,
}

/// The decision table for switch errors.
pub fn decide(stage: SwitchStage, kind: ProviderErrorKind) -> SwitchAction {
    match (stage, kind) {
        (SwitchStage::Switch, ProviderErrorKind::UnrecognizedChain) => SwitchAction::AddChain,
        (_, ProviderErrorKind::InvalidParams) => SwitchAction::FlagInvalidParams,
        (SwitchStage::Add, ProviderErrorKind::UnrecognizedChain)
        | (_, ProviderErrorKind::WalletRejected)
        | (_, ProviderErrorKind::Unknown) => SwitchAction::Report,
    }
}

/// How a switch attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchFailure {
    /// The wallet rejected the parameters
    InvalidParams(ProviderError),
    /// Any other failure, reported to the user without flagging the inputs
    Other {
        /// Request that failed
        stage: SwitchStage,
        /// Wallet error
        error: ProviderError,
    },
}

/// States of a single switch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchState {
    /// Nothing in flight
    Idle,
    /// Waiting for the wallet to switch
    SwitchRequested,
    /// The wallet switched to a chain it already knew
    SwitchAccepted,
    /// Waiting for the wallet to register the chain
    AddRequested,
    /// The wallet registered (and switched to) the chain
    AddAccepted,
    /// The attempt ended without switching
    Failed(SwitchFailure),
}

impl SwitchState {
    /// Advances the machine with the result of the request issued in this state.
    ///
    /// Terminal states and `Idle` are returned unchanged.
    pub fn on_result(self, result: ProviderResult<()>) -> SwitchState {
        let stage = match self {
            SwitchState::SwitchRequested => SwitchStage::Switch,
            SwitchState::AddRequested => SwitchStage::Add,
            other => return other,
        };

        match result {
            Ok(()) => match stage {
                SwitchStage::Switch => SwitchState::SwitchAccepted,
                SwitchStage::Add => SwitchState::AddAccepted,
            },
            Err(error) => match decide(stage, error.kind()) {
                SwitchAction::AddChain => SwitchState::AddRequested,
                SwitchAction::FlagInvalidParams => {
                    SwitchState::Failed(SwitchFailure::InvalidParams(error))
                }
                SwitchAction::Report => SwitchState::Failed(SwitchFailure::Other { stage, error }),
            },
        }
    }

    /// True for `SwitchAccepted`, `AddAccepted` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SwitchState::SwitchAccepted | SwitchState::AddAccepted | SwitchState::Failed(_)
        )
    }
}

/// Everything a switch attempt needs, captured before the first await.
#[derive(Debug, Clone)]
pub struct SwitchRequest<P> {
    /// Wallet to talk to
    pub provider: P,
    /// Target chain id, `0x` hex
    pub chain_id: String,
    /// Registration request used on "unrecognized chain"
    pub add_params: AddChainParams,
}

/// Final result of [`run_switch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The wallet switched to a known chain
    Switched,
    /// The wallet registered the chain
    Added,
    /// The attempt failed
    Failed(SwitchFailure),
}

impl SwitchOutcome {
    /// True when the wallet is now on the requested chain
    pub fn is_success(&self) -> bool {
        matches!(self, SwitchOutcome::Switched | SwitchOutcome::Added)
    }
}

/// Drives the state machine against the wallet. No retries.
pub async fn run_switch<P: WalletProvider>(request: &SwitchRequest<P>) -> SwitchOutcome {
    let mut state = SwitchState::SwitchRequested;
    loop {
        debug!(chain_id = %request.chain_id, ?state, "network switch");
        state = match state {
            SwitchState::SwitchRequested => {
                let result = request.provider.switch_chain(&request.chain_id).await;
                SwitchState::SwitchRequested.on_result(result)
            }
            SwitchState::AddRequested => {
                info!(chain_id = %request.chain_id, "chain unknown to wallet, requesting registration");
                let result = request.provider.add_chain(&request.add_params).await;
                SwitchState::AddRequested.on_result(result)
            }
            SwitchState::SwitchAccepted => return SwitchOutcome::Switched,
            SwitchState::AddAccepted => return SwitchOutcome::Added,
            SwitchState::Failed(failure) => {
                if let SwitchFailure::Other { stage, error } = &failure {
                    warn!(?stage, code = ?error.code, %error, "network switch failed");
                }
                return SwitchOutcome::Failed(failure);
            }
            SwitchState::Idle => return SwitchOutcome::Failed(SwitchFailure::Other {
                stage: SwitchStage::Switch,
                error: ProviderError::other("network switch was not started"),
            }),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dapp_traits::codes;

    #[test]
    fn test_decision_table() {
        use ProviderErrorKind::*;
        use SwitchAction::*;
        use SwitchStage::*;

        let table = [
            (Switch, UnrecognizedChain, AddChain),
            (Switch, InvalidParams, FlagInvalidParams),
            (Switch, WalletRejected, Report),
            (Switch, Unknown, Report),
            (Add, UnrecognizedChain, Report),
            (Add, InvalidParams, FlagInvalidParams),
            (Add, WalletRejected, Report),
            (Add, Unknown, Report),
        ];
        for (stage, kind, action) in table {
            assert_eq!(decide(stage, kind), action, "{stage:?} {kind:?}");
        }
    }

    #[test]
    fn test_transitions() {
        assert_eq!(
            SwitchState::SwitchRequested.on_result(Ok(())),
            SwitchState::SwitchAccepted
        );
        assert_eq!(
            SwitchState::SwitchRequested.on_result(Err(ProviderError::unrecognized_chain("0x1"))),
            SwitchState::AddRequested
        );
        assert_eq!(
            SwitchState::AddRequested.on_result(Ok(())),
            SwitchState::AddAccepted
        );

        let invalid = ProviderError::new(codes::INVALID_PARAMS, "bad rpc");
        assert_eq!(
            SwitchState::AddRequested.on_result(Err(invalid.clone())),
            SwitchState::Failed(SwitchFailure::InvalidParams(invalid))
        );

        let rejected = ProviderError::user_rejected();
        assert_eq!(
            SwitchState::SwitchRequested.on_result(Err(rejected.clone())),
            SwitchState::Failed(SwitchFailure::Other {
                stage: SwitchStage::Switch,
                error: rejected,
            })
        );
    }

    #[test]
    fn test_terminal_states_are_stable() {
        assert_eq!(SwitchState::Idle.on_result(Ok(())), SwitchState::Idle);
        assert_eq!(
            SwitchState::AddAccepted.on_result(Err(ProviderError::other("late"))),
            SwitchState::AddAccepted
        );
        assert!(SwitchState::SwitchAccepted.is_terminal());
        assert!(!SwitchState::AddRequested.is_terminal());
    }
}
