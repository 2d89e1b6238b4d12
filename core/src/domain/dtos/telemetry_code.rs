use serde::Serialize;
use std::fmt::Display;

#[derive(Clone, Debug, Serialize)]
#[serde(untagged, rename_all = "UPPERCASE")]
pub(crate) enum TelemetryCode {
    // ? -----------------------------------------------------------------------
    // ? Reserved codes to the run_mcmc use case
    //
    /// MCMC run started
    ///
    UCMCMC0001,
    //
    /// MCMC run ended
    ///
    UCMCMC0002,
    //
    /// A walker started its chain
    ///
    UCMCMC0003,
    //
    /// A walker finished its chain
    ///
    UCMCMC0004,
    //
    /// A tree was saved to the walker samples
    ///
    UCMCMC0005,
    // ? -----------------------------------------------------------------------

    // ? -----------------------------------------------------------------------
    // ? Reserved codes to the nni use cases
    //
    /// A pivot node was chosen for the NNI step
    ///
    UCNNI0001,
    //
    /// A candidate topology was accepted
    ///
    UCNNI0002,
    //
    /// Both candidate topologies were rejected
    ///
    UCNNI0003,
    // ? -----------------------------------------------------------------------

    // ? -----------------------------------------------------------------------
    // ? Reserved codes to the initialization and output use cases
    //
    /// A walker tree was initialized
    ///
    UCINIT0001,
    //
    /// Synthetic data was simulated
    ///
    UCINIT0002,
    //
    /// Saved samples were written
    ///
    UCWRITE0001,
    // ? -----------------------------------------------------------------------
}

impl Display for TelemetryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
