use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    clap::ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// Newick format
    ///
    /// One tree per line, branch lengths included.
    #[default]
    Newick,

    /// YAML format
    ///
    /// The full tree structures, clade arena included.
    Yaml,

    /// Zstandard format
    ///
    /// The YAML content compressed using Zstandard. See
    /// https://github.com/facebook/zstd for more information.
    Zstd,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Newick => "nwk",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Zstd => "yaml.zst",
        }
    }
}
