//! Closed asset universe for the lending market and swap venues.
//!
//! Asset identifiers arrive as free-form strings at the external boundary
//! (CLI, config, request objects) and are validated into these enums once.
//! Everything past the boundary matches exhaustively on the closed forms.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Assets accepted as lending-market collateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollateralAsset {
    /// Wrapped Bitcoin on Stacks.
    Sbtc,
    /// Liquid-stacked STX.
    Ststx,
    /// Wrapped STX.
    Wstx,
}

impl CollateralAsset {
    pub const ALL: [Self; 3] = [Self::Sbtc, Self::Ststx, Self::Wstx];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sbtc => "sbtc",
            Self::Ststx => "ststx",
            Self::Wstx => "wstx",
        }
    }

    /// Oracle symbol for this asset's reference price feed.
    pub fn price_symbol(&self) -> &'static str {
        match self {
            Self::Sbtc => "BTC/USD",
            Self::Ststx | Self::Wstx => "STX/USD",
        }
    }
}

impl fmt::Display for CollateralAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollateralAsset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sbtc" => Ok(Self::Sbtc),
            "ststx" => Ok(Self::Ststx),
            "wstx" => Ok(Self::Wstx),
            other => Err(CoreError::UnknownAsset(other.to_string())),
        }
    }
}

/// Stablecoins available to borrow against collateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtAsset {
    /// Allbridge-bridged USDC.
    Aeusdc,
    /// Hermetica USDh.
    Usdh,
    /// Bridged USDT.
    Susdt,
    /// Arkadiko USDA.
    Usda,
}

impl DebtAsset {
    pub const ALL: [Self; 4] = [Self::Aeusdc, Self::Usdh, Self::Susdt, Self::Usda];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aeusdc => "aeusdc",
            Self::Usdh => "usdh",
            Self::Susdt => "susdt",
            Self::Usda => "usda",
        }
    }
}

impl fmt::Display for DebtAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebtAsset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aeusdc" => Ok(Self::Aeusdc),
            "usdh" => Ok(Self::Usdh),
            "susdt" => Ok(Self::Susdt),
            "usda" => Ok(Self::Usda),
            other => Err(CoreError::UnknownAsset(other.to_string())),
        }
    }
}

/// Any swappable asset: collateral or debt side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Asset {
    Collateral(CollateralAsset),
    Debt(DebtAsset),
}

impl Asset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collateral(a) => a.as_str(),
            Self::Debt(a) => a.as_str(),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CollateralAsset> for Asset {
    fn from(a: CollateralAsset) -> Self {
        Self::Collateral(a)
    }
}

impl From<DebtAsset> for Asset {
    fn from(a: DebtAsset) -> Self {
        Self::Debt(a)
    }
}

impl FromStr for Asset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(c) = s.parse::<CollateralAsset>() {
            return Ok(Self::Collateral(c));
        }
        if let Ok(d) = s.parse::<DebtAsset>() {
            return Ok(Self::Debt(d));
        }
        Err(CoreError::UnknownAsset(s.to_string()))
    }
}
