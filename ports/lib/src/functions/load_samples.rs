use anyhow::{Error, Result};
use phylomc_core::domain::dtos::tree::Tree;
use std::{
    fs::{read_to_string, File},
    path::PathBuf,
};
use zstd::Decoder;

/// Load trees written by the sampler.
///
/// The file may hold zstd compressed YAML, plain YAML, or Newick with one
/// tree per line. Formats are tried in that order.
pub fn load_samples(path: PathBuf) -> Result<Vec<Tree>> {
    //
    // Read from binary file
    //
    let read_from_zstd = |path: PathBuf| -> Result<Vec<Tree>> {
        let reader = File::open(path)?;
        let reader = Decoder::new(reader)?;
        match serde_yaml::from_reader(reader) {
            Err(err) => Err(Error::from(err)),
            Ok(buffer) => Ok(buffer),
        }
    };

    //
    // Read from yaml file
    //
    let read_from_yaml = |path: PathBuf| -> Result<Vec<Tree>> {
        let content = read_to_string(path)?;
        match serde_yaml::from_str::<Vec<Tree>>(content.as_str()) {
            Err(err) => Err(Error::from(err)),
            Ok(buffer) => Ok(buffer),
        }
    };

    //
    // Read from newick file
    //
    let read_from_newick = |path: PathBuf| -> Result<Vec<Tree>> {
        read_to_string(path)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| Tree::from_newick(line).map_err(Error::from))
            .collect()
    };

    //
    // Load the samples content
    //
    let bin_err = match read_from_zstd(path.to_owned()) {
        Ok(trees) => return Ok(trees),
        Err(err) => err,
    };

    let yaml_err = match read_from_yaml(path.to_owned()) {
        Ok(trees) => return Ok(trees),
        Err(err) => err,
    };

    let newick_err = match read_from_newick(path) {
        Ok(trees) => return Ok(trees),
        Err(err) => err,
    };

    Err(Error::msg(format!(
        "Error loading samples: {bin_err} | {yaml_err} | {newick_err}"
    )))
}
