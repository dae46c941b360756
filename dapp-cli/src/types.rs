//! CLI Types

use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum CliResponse {
    Continue,
    Exit,
}

/// Main menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ToggleConnection,
    Refresh,
    TargetAddress,
    Nonce,
    Amount,
    ToggleAdvanced,
    GasLimit,
    MaxPriorityFee,
    MaxFee,
    Clear,
    Send,
    Network,
    History,
    Quit,
}

impl FromStr for MenuAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "1" => Self::ToggleConnection,
            "2" => Self::Refresh,
            "3" => Self::TargetAddress,
            "4" => Self::Nonce,
            "5" => Self::Amount,
            "6" => Self::ToggleAdvanced,
            "7" => Self::GasLimit,
            "8" => Self::MaxPriorityFee,
            "9" => Self::MaxFee,
            "10" => Self::Clear,
            "11" => Self::Send,
            "12" => Self::Network,
            "13" => Self::History,
            "0" | "q" | "quit" | "exit" => Self::Quit,
            other => return Err(format!("Unknown choice: {other}")),
        })
    }
}

/// Network dialog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    ChainName,
    RpcUrl,
    ChainId,
    CurrencyDecimals,
    CurrencySymbol,
    Switch,
    Cancel,
}

impl FromStr for DialogAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "1" => Self::ChainName,
            "2" => Self::RpcUrl,
            "3" => Self::ChainId,
            "4" => Self::CurrencyDecimals,
            "5" => Self::CurrencySymbol,
            "6" => Self::Switch,
            "0" | "c" | "cancel" => Self::Cancel,
            other => return Err(format!("Unknown choice: {other}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choices() {
        assert_eq!("1".parse::<MenuAction>().unwrap(), MenuAction::ToggleConnection);
        assert_eq!(" 11\n".parse::<MenuAction>().unwrap(), MenuAction::Send);
        assert_eq!("q".parse::<MenuAction>().unwrap(), MenuAction::Quit);
        assert!("14".parse::<MenuAction>().is_err());
        assert!("".parse::<MenuAction>().is_err());
    }

    #[test]
    fn test_dialog_choices() {
        assert_eq!("6".parse::<DialogAction>().unwrap(), DialogAction::Switch);
        assert_eq!("cancel".parse::<DialogAction>().unwrap(), DialogAction::Cancel);
        assert!("7".parse::<DialogAction>().is_err());
    }
}
