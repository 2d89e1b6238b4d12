use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum LogFormat {
    /// ANSI format
    ///
    /// This format is human-readable and colorful.
    #[default]
    Ansi,

    /// JSON format
    ///
    /// This format is machine-readable and can be used for log analysis.
    Json,
}
