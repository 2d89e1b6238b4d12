use serde::Serialize;
use std::fmt::Display;

#[derive(Clone, Debug, Serialize)]
#[serde(untagged, rename_all = "UPPERCASE")]
pub(crate) enum TelemetryCode {
    /// Walker summary reported after a sampling run
    CLISAMPLE0001,

    /// Sampling run outputs written
    CLISAMPLE0002,

    /// Simulated data written
    CLISIM0001,
}

impl Display for TelemetryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
