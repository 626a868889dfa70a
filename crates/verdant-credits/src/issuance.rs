//! # Carbon Credit Issuance
//!
//! Converts metered energy output into carbon credits (1 credit = 1 tCO2e
//! avoided versus the grid) and records them on the ledger.
//!
//! ## Carbon Intensity (gCO2/kWh)
//!
//! | Source | Intensity | Renewable |
//! |--------|-----------|-----------|
//! | Solar | 40 | yes |
//! | Wind | 10 | yes |
//! | Hydro | 20 | yes |
//! | Geothermal | 38 | yes |
//! | Renewable Mix | 50 | yes |
//! | Nuclear | 12 | no |
//! | Grid Mix | 400 | no |
//! | High Carbon | 900 | no |
//!
//! ```text
//! credits = floor(output_mwh * (grid_intensity - source_intensity) / 1000)
//! ```

use crate::ledger::TokenizationLedger;
use crate::store::CreditStore;
use crate::types::{ProjectCreditLedgerEntry, ProjectId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use verdant_core::error::{Result, VerdantError};
use verdant_core::FixedPointAmount;

/// Grid-average intensity used as the avoided-emissions baseline
pub const DEFAULT_GRID_INTENSITY: u32 = 400;

/// g/kWh × MWh = kg; kg / 1000 = t
const KG_PER_TONNE: u128 = 1_000;

/// Energy source classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergySource {
    /// 100% solar power
    Solar,
    /// 100% wind power
    Wind,
    /// Hydroelectric power
    Hydro,
    /// Nuclear power
    Nuclear,
    /// Geothermal
    Geothermal,
    /// Mixed renewable sources
    RenewableMix,
    /// Standard grid (unknown mix)
    GridMix,
    /// High carbon (coal, gas)
    HighCarbon,
}

impl EnergySource {
    /// Carbon intensity (gCO2/kWh)
    pub fn carbon_intensity(&self) -> u32 {
        match self {
            Self::Solar => 40,
            Self::Wind => 10,
            Self::Hydro => 20,
            Self::Nuclear => 12,
            Self::Geothermal => 38,
            Self::RenewableMix => 50,
            Self::GridMix => 400,
            Self::HighCarbon => 900,
        }
    }

    /// Only renewable output earns credits
    pub fn is_renewable(&self) -> bool {
        match self {
            Self::Solar | Self::Wind | Self::Hydro | Self::Geothermal | Self::RenewableMix => true,
            Self::Nuclear | Self::GridMix | Self::HighCarbon => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Solar => "Solar",
            Self::Wind => "Wind",
            Self::Hydro => "Hydroelectric",
            Self::Nuclear => "Nuclear",
            Self::Geothermal => "Geothermal",
            Self::RenewableMix => "Renewable Mix",
            Self::GridMix => "Grid Mix",
            Self::HighCarbon => "High Carbon",
        }
    }
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnergySource {
    type Err = VerdantError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "solar" => Ok(Self::Solar),
            "wind" => Ok(Self::Wind),
            "hydro" | "hydroelectric" => Ok(Self::Hydro),
            "nuclear" => Ok(Self::Nuclear),
            "geothermal" => Ok(Self::Geothermal),
            "renewable_mix" => Ok(Self::RenewableMix),
            "grid_mix" | "grid" => Ok(Self::GridMix),
            "high_carbon" => Ok(Self::HighCarbon),
            _ => Err(VerdantError::InvalidFormat(format!("unknown energy source {:?}", s))),
        }
    }
}

/// Credits earned by `output_mwh` of energy from `source`.
///
/// The result has the same scale as `output_mwh`. Non-renewable sources and
/// sources at or above the grid baseline earn nothing.
pub fn credits_for_output(
    output_mwh: &FixedPointAmount,
    source: EnergySource,
    grid_intensity: u32,
) -> Result<FixedPointAmount> {
    let source_intensity = source.carbon_intensity();
    if !source.is_renewable() || source_intensity >= grid_intensity {
        return Ok(FixedPointAmount::zero(output_mwh.decimals()));
    }

    let avoided_per_kwh = u128::from(grid_intensity - source_intensity);
    output_mwh.checked_mul_ratio(avoided_per_kwh, KG_PER_TONNE)
}

/// Outcome of one issuance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceReceipt {
    /// Energy source
    pub source: EnergySource,

    /// Metered output
    pub output_mwh: FixedPointAmount,

    /// Credits added to the ledger
    pub credits: FixedPointAmount,

    /// Project entry after issuance
    pub entry: ProjectCreditLedgerEntry,
}

/// Issues credits for metered output onto a ledger
pub struct CreditIssuer<'a, S: CreditStore> {
    ledger: &'a TokenizationLedger<S>,

    /// Baseline intensity (gCO2/kWh)
    grid_intensity: u32,
}

impl<'a, S: CreditStore> CreditIssuer<'a, S> {
    pub fn new(ledger: &'a TokenizationLedger<S>) -> Self {
        Self::with_grid_intensity(ledger, DEFAULT_GRID_INTENSITY)
    }

    pub fn with_grid_intensity(ledger: &'a TokenizationLedger<S>, grid_intensity: u32) -> Self {
        Self {
            ledger,
            grid_intensity,
        }
    }

    /// Preview credits without touching the ledger
    pub fn preview(&self, output_mwh: &FixedPointAmount, source: EnergySource) -> Result<FixedPointAmount> {
        credits_for_output(output_mwh, source, self.grid_intensity)
    }

    /// Convert output to credits and record them as generated.
    ///
    /// Output that earns no credits is rejected with `InvalidAmount`.
    pub fn issue(
        &self,
        project_id: &ProjectId,
        output_mwh: FixedPointAmount,
        source: EnergySource,
    ) -> Result<IssuanceReceipt> {
        let credits = self.preview(&output_mwh, source)?;
        if credits.is_zero() {
            return Err(VerdantError::InvalidAmount(format!(
                "{} MWh of {} earns no credits",
                output_mwh, source
            )));
        }

        let entry = self.ledger.record_generation(project_id, credits)?;

        tracing::debug!(
            project = %project_id,
            source = %source,
            output_mwh = %output_mwh,
            credits = %credits,
            "issued carbon credits"
        );

        Ok(IssuanceReceipt {
            source,
            output_mwh,
            credits,
            entry,
        })
    }
}
