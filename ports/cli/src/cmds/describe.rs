use crate::dtos::output_format::DescriptionOutputFormat;

use anyhow::Result;
use clap::Parser;
use phylomc_core::use_cases::summarize_samples;
use phylomc_ports_lib::load_samples;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub(crate) struct Arguments {
    /// Path to the samples file
    ///
    /// The file could be in Newick, YAML or compressed YAML format.
    pub(super) samples_file_path: PathBuf,

    /// Output format
    #[arg(long, short = 'f', default_value = "tsv")]
    pub(super) out_format: DescriptionOutputFormat,
}

pub(crate) fn describe_samples_cmd(args: Arguments) -> Result<()> {
    let trees = load_samples(args.samples_file_path)?;
    let frequencies = summarize_samples(trees.iter());

    match args.out_format {
        DescriptionOutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&frequencies)?);
        }
        DescriptionOutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&frequencies)?);
        }
        DescriptionOutputFormat::Tsv => {
            println!("count\tfrequency\ttopology");
            for frequency in frequencies {
                println!(
                    "{}\t{:.4}\t{}",
                    frequency.count, frequency.frequency, frequency.signature
                );
            }
        }
    }

    Ok(())
}
