use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub(crate) enum DescriptionOutputFormat {
    /// JSON format
    Json,

    /// YAML format
    Yaml,

    /// Tab separated values
    ///
    /// One line per topology: count, frequency and signature.
    Tsv,
}
