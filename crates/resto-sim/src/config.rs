//! `RestaurantConfig`: every tunable of a run.

use resto_core::SizeRange;

use crate::{SimError, SimResult};

/// Parameters of one simulation run.
///
/// All durations are in virtual minutes.  The `*_rate` fields are *means*
/// of exponential distributions, not rates; the names follow the
/// established parameter set.
///
/// Typically loaded from JSON by the application crate (feature `serde`);
/// missing fields take their [`Default`] values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RestaurantConfig {
    /// Mean dine-in interarrival time.  `+∞` disables the channel; JSON
    /// spells it `null`.
    #[cfg_attr(feature = "serde", serde(with = "mean_or_never"))]
    pub dinein_arrival_rate: f64,

    /// Mean takeout interarrival time.  `+∞` disables the channel.
    #[cfg_attr(feature = "serde", serde(with = "mean_or_never"))]
    pub takeout_arrival_rate: f64,

    /// Mean service time per guest; a party of `n` is served for an
    /// exponential time with mean `n × base_service_rate`.
    pub base_service_rate: f64,

    /// Cooking time per unit of party or order size.
    pub cook_time: f64,

    /// Mean order-taking time, both channels.
    pub service_rate: f64,

    pub num_servers: u32,

    /// Kitchen stations.
    pub num_cooks: u32,

    /// Maximum number of seated parties.  `0` turns every dine-in party away.
    pub num_tables: u32,

    /// Horizon after which no new entity is generated.
    pub simulation_duration: f64,

    pub random_seed: u64,

    pub dinein_party_size: SizeRange,

    pub takeout_order_size: SizeRange,

    /// Finish in-flight entities after the horizon instead of leaving them
    /// pending.
    pub drain_after_horizon: bool,
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            dinein_arrival_rate:  5.0,
            takeout_arrival_rate: 8.0,
            base_service_rate:    4.0,
            cook_time:            2.0,
            service_rate:         3.0,
            num_servers:          3,
            num_cooks:            2,
            num_tables:           10,
            simulation_duration:  480.0,
            random_seed:          42,
            dinein_party_size:    SizeRange { lo: 1, hi: 6 },
            takeout_order_size:   SizeRange { lo: 1, hi: 3 },
            drain_after_horizon:  true,
        }
    }
}

impl RestaurantConfig {
    /// Check every constraint.  Called by [`SimBuilder::build`][crate::SimBuilder::build]
    /// before any state is created.
    pub fn validate(&self) -> SimResult<()> {
        positive("dinein_arrival_rate", self.dinein_arrival_rate, true)?;
        positive("takeout_arrival_rate", self.takeout_arrival_rate, true)?;
        positive("base_service_rate", self.base_service_rate, false)?;
        positive("cook_time", self.cook_time, false)?;
        positive("service_rate", self.service_rate, false)?;
        positive("simulation_duration", self.simulation_duration, false)?;
        at_least_one("num_servers", self.num_servers)?;
        at_least_one("num_cooks", self.num_cooks)?;
        self.dinein_party_size
            .validate()
            .map_err(|e| SimError::Config(format!("dinein_party_size: {e}")))?;
        self.takeout_order_size
            .validate()
            .map_err(|e| SimError::Config(format!("takeout_order_size: {e}")))?;
        Ok(())
    }

    /// The same configuration with another seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self { random_seed: seed, ..self.clone() }
    }
}

fn positive(field: &str, value: f64, allow_infinite: bool) -> SimResult<()> {
    if value.is_nan() || value <= 0.0 {
        return Err(SimError::Config(format!("{field} must be positive, got {value}")));
    }
    if !allow_infinite && value.is_infinite() {
        return Err(SimError::Config(format!("{field} must be finite")));
    }
    Ok(())
}

fn at_least_one(field: &str, value: u32) -> SimResult<()> {
    if value == 0 {
        return Err(SimError::Config(format!("{field} must be at least 1")));
    }
    Ok(())
}

/// JSON has no infinity, so an infinite mean round-trips as `null`.
#[cfg(feature = "serde")]
mod mean_or_never {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mean: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if mean.is_infinite() && mean.is_sign_positive() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(mean)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
