//! Registrar constants
//!
//! Each realm's registrar fixes the vote weight scaling for its voting mint. The
//! values are supplied by configuration and validated once; nothing here is ever
//! inferred from account data.

use super::Address;
use serde::{Deserialize, Serialize};

/// Largest decimal shift accepted for a voting mint
pub const MAX_TOKEN_DECIMAL_SHIFT: u8 = 18;

/// Realm-specific multiplier constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrarConfig {
    /// Scaled weight of an unlocked token
    pub baseline_scale: u64,
    /// Additional scaled weight reached at full saturation
    pub max_extra_scale: u64,
    /// Remaining lockup duration at which the bonus stops growing
    pub saturation_secs: u64,
    /// Raw amounts are divided by 10^shift to obtain whole tokens
    pub token_decimal_shift: u8,
    /// Registrar account of the realm; voter accounts of other registrars
    /// are ignored when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar: Option<Address>,
}

impl RegistrarConfig {
    pub fn builder() -> RegistrarConfigBuilder {
        RegistrarConfigBuilder::default()
    }

    /// Check the constants can produce a multiplier
    pub fn validate(&self) -> Result<(), String> {
        if self.baseline_scale == 0 {
            return Err("baseline_scale cannot be zero".to_string());
        }
        if self.saturation_secs == 0 {
            return Err("saturation_secs cannot be zero".to_string());
        }
        if self.token_decimal_shift > MAX_TOKEN_DECIMAL_SHIFT {
            return Err(format!(
                "token_decimal_shift {} exceeds maximum of {}",
                self.token_decimal_shift, MAX_TOKEN_DECIMAL_SHIFT
            ));
        }
        Ok(())
    }

    /// Upper bound of the lockup multiplier: 1 + max_extra / baseline
    ///
    /// A zero baseline admits no bonus.
    pub fn max_multiplier(&self) -> f64 {
        if self.baseline_scale == 0 {
            return 1.0;
        }
        1.0 + self.max_extra_scale as f64 / self.baseline_scale as f64
    }

    /// False when `registrar` is configured and differs from `account_registrar`
    pub fn accepts_registrar(&self, account_registrar: Option<&Address>) -> bool {
        match (&self.registrar, account_registrar) {
            (Some(expected), Some(actual)) => expected == actual,
            _ => true,
        }
    }
}

/// Builder for RegistrarConfig with validation
#[derive(Debug, Default)]
pub struct RegistrarConfigBuilder {
    baseline_scale: Option<u64>,
    max_extra_scale: Option<u64>,
    saturation_secs: Option<u64>,
    token_decimal_shift: Option<u8>,
    registrar: Option<Address>,
}

impl RegistrarConfigBuilder {
    pub fn baseline_scale(mut self, value: u64) -> Self {
        self.baseline_scale = Some(value);
        self
    }

    pub fn max_extra_scale(mut self, value: u64) -> Self {
        self.max_extra_scale = Some(value);
        self
    }

    pub fn saturation_secs(mut self, value: u64) -> Self {
        self.saturation_secs = Some(value);
        self
    }

    pub fn token_decimal_shift(mut self, value: u8) -> Self {
        self.token_decimal_shift = Some(value);
        self
    }

    pub fn registrar(mut self, registrar: Address) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// Build the configuration; every scale field is required
    pub fn build(self) -> Result<RegistrarConfig, String> {
        let config = RegistrarConfig {
            baseline_scale: self.baseline_scale.ok_or("baseline_scale is required")?,
            max_extra_scale: self.max_extra_scale.ok_or("max_extra_scale is required")?,
            saturation_secs: self.saturation_secs.ok_or("saturation_secs is required")?,
            token_decimal_shift: self
                .token_decimal_shift
                .ok_or("token_decimal_shift is required")?,
            registrar: self.registrar,
        };
        config.validate()?;
        Ok(config)
    }
}
