use serde::{Deserialize, Serialize};

/// Configuration of a multi-walker MCMC run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// Number of independent chains.
    pub nwalkers: usize,

    /// Number of NNI steps performed by each walker.
    pub nsteps: usize,

    /// Number of initial steps never saved.
    pub burn_in: usize,

    /// Save one tree every `save_frequency` steps after the burn-in.
    pub save_frequency: usize,

    /// Base seed of the walker random generators.
    ///
    /// Walker `i` is seeded with `seed + i`. When absent, every walker draws
    /// its seed from the operating system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ChainConfig {
    /// Check the run bounds, returning the violated rule on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.nwalkers < 1 {
            return Err("nwalkers should be at least 1".to_string());
        }

        if self.burn_in >= self.nsteps {
            return Err(format!(
                "burn_in ({}) should be lower than nsteps ({})",
                self.burn_in, self.nsteps
            ));
        }

        if self.save_frequency == 0 {
            return Err("save_frequency should be greater than 0".to_string());
        }

        Ok(())
    }

    /// Whether the tree produced by the 1-based `step` should be saved.
    pub fn is_saved_step(&self, step: usize) -> bool {
        step > self.burn_in && (step - self.burn_in) % self.save_frequency == 0
    }

    /// Number of trees saved by each walker.
    pub fn expected_samples(&self) -> usize {
        self.nsteps.saturating_sub(self.burn_in) / self.save_frequency.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(
        nsteps: usize,
        burn_in: usize,
        save_frequency: usize,
    ) -> ChainConfig {
        ChainConfig {
            nwalkers: 1,
            nsteps,
            burn_in,
            save_frequency,
            seed: None,
        }
    }

    #[test]
    fn test_validate() {
        assert!(config(200, 50, 10).validate().is_ok());
        assert!(config(50, 50, 10).validate().is_err());
        assert!(config(200, 50, 0).validate().is_err());

        let mut no_walkers = config(200, 50, 10);
        no_walkers.nwalkers = 0;
        assert!(no_walkers.validate().is_err());
    }

    #[test]
    fn test_saved_steps_match_expected_count() {
        for (nsteps, burn_in, save_frequency) in
            [(200, 50, 10), (155, 0, 10), (10, 9, 1), (7, 2, 3)]
        {
            let config = config(nsteps, burn_in, save_frequency);
            let saved =
                (1..=nsteps).filter(|s| config.is_saved_step(*s)).count();

            assert_eq!(saved, config.expected_samples());
        }

        assert_eq!(config(200, 50, 10).expected_samples(), 15);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let config: ChainConfig = serde_yaml::from_str(
            "nwalkers: 2\nnsteps: 100\nburnIn: 10\n\
            saveFrequency: 5\nseed: 42\n",
        )
        .unwrap();

        assert_eq!(config.burn_in, 10);
        assert_eq!(config.seed, Some(42));
    }
}
