use super::shared::write_or_append_to_file::write_or_append_to_file;
use crate::domain::dtos::{
    output_format::OutputFormat, telemetry_code::TelemetryCode, tree::Tree,
};

use mycelium_base::utils::errors::{execution_err, use_case_err, MappedErrors};
use std::{
    fs::{create_dir_all, remove_file},
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Write sampled trees to a single file.
///
/// Newick output holds one tree per line. YAML output holds the sequence of
/// full tree records, and the Zstandard output is the same YAML compressed.
/// The file extension is set from the output format and the final path is
/// returned. An existing file is only replaced when `overwrite` is set.
#[tracing::instrument(name = "WritingSamples", skip(trees))]
pub fn write_samples<'a, I>(
    trees: I,
    out_file: &Path,
    output_format: &OutputFormat,
    overwrite: bool,
) -> Result<PathBuf, MappedErrors>
where
    I: IntoIterator<Item = &'a Tree>,
{
    // ? -----------------------------------------------------------------------
    // ? Build the output path
    // ? -----------------------------------------------------------------------

    let mut out_file_path = out_file.to_owned();
    out_file_path.set_extension(output_format.extension());

    if let Some(out_dir) = out_file_path.parent() {
        if !out_dir.as_os_str().is_empty() && !out_dir.exists() {
            if let Err(err) = create_dir_all(out_dir) {
                return execution_err(format!(
                    "Could not create directory {out_dir:?}: {err}"
                ))
                .as_error();
            }
        }
    }

    if out_file_path.exists() {
        if !overwrite {
            return use_case_err(format!(
                "Could not overwrite existing file {:?} when overwrite \
                option is `false`.",
                out_file_path
            ))
            .as_error();
        }

        match remove_file(out_file_path.clone()) {
            Err(err) => {
                return use_case_err(format!(
                    "Could not remove file given {err}"
                ))
                .as_error()
            }
            Ok(_) => warn!("Output file overwritten!"),
        };
    };

    // ? -----------------------------------------------------------------------
    // ? Serialize the samples
    // ? -----------------------------------------------------------------------

    let trees = trees.into_iter().collect::<Vec<&Tree>>();

    let content = match output_format {
        OutputFormat::Newick => trees
            .iter()
            .map(|tree| format!("{}\n", tree.to_newick()))
            .collect::<String>()
            .into_bytes(),
        OutputFormat::Yaml => to_yaml(&trees)?.into_bytes(),
        OutputFormat::Zstd => {
            match zstd::encode_all(to_yaml(&trees)?.as_bytes(), 0) {
                Ok(content) => content,
                Err(err) => {
                    return execution_err(format!(
                        "Could not compress samples: {err}"
                    ))
                    .as_error()
                }
            }
        }
    };

    let (writer, file) = write_or_append_to_file(out_file_path.as_path())?;
    writer(&content, file)?;

    debug!(
        code = TelemetryCode::UCWRITE0001.to_string(),
        samples = trees.len(),
        path = ?out_file_path,
        "Samples written"
    );

    Ok(out_file_path)
}

fn to_yaml(trees: &[&Tree]) -> Result<String, MappedErrors> {
    serde_yaml::to_string(trees).map_err(|err| {
        execution_err(format!("Could not serialize samples: {err}"))
    })
}

// ? ---------------------------------------------------------------------------
// ? TESTS
// ? ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        env::temp_dir,
        fs::{read, read_to_string},
    };

    fn trees() -> Vec<Tree> {
        vec![
            Tree::from_newick("((A:1,B:2):3,(C:4,D:5):6);").unwrap(),
            Tree::from_newick("((A:1,C:2):3,(B:4,D:5):6);").unwrap(),
        ]
    }

    fn out_file(name: &str) -> PathBuf {
        let path = temp_dir().join("phylomc-write-samples").join(name);
        for ext in ["nwk", "yaml", "yaml.zst"] {
            let _ = remove_file(path.with_extension(ext));
        }
        path
    }

    #[test]
    fn test_write_newick_lines() {
        let trees = trees();
        let path = write_samples(
            trees.iter(),
            &out_file("newick"),
            &OutputFormat::Newick,
            false,
        )
        .unwrap();

        assert_eq!(path.extension().unwrap(), "nwk");

        let content = read_to_string(&path).unwrap();
        let lines = content.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            Tree::from_newick(lines[1]).unwrap().topology_signature(),
            trees[1].topology_signature()
        );
    }

    #[test]
    fn test_write_yaml_and_zstd() {
        let trees = trees();

        let yaml = write_samples(
            trees.iter(),
            &out_file("yaml"),
            &OutputFormat::Yaml,
            false,
        )
        .unwrap();

        let loaded: Vec<Tree> =
            serde_yaml::from_str(&read_to_string(&yaml).unwrap()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(
            loaded[0].topology_signature(),
            trees[0].topology_signature()
        );

        let zst = write_samples(
            trees.iter(),
            &out_file("zstd"),
            &OutputFormat::Zstd,
            false,
        )
        .unwrap();

        let decoded = zstd::decode_all(read(&zst).unwrap().as_slice()).unwrap();
        let loaded: Vec<Tree> = serde_yaml::from_slice(&decoded).unwrap();
        assert_eq!(
            loaded[1].topology_signature(),
            trees[1].topology_signature()
        );
    }

    #[test]
    fn test_overwrite_is_explicit() {
        let trees = trees();
        let path = out_file("overwrite");

        write_samples(trees.iter(), &path, &OutputFormat::Newick, false)
            .unwrap();

        assert!(
            write_samples(trees.iter(), &path, &OutputFormat::Newick, false)
                .is_err()
        );

        let written =
            write_samples(trees[..1].iter(), &path, &OutputFormat::Newick, true)
                .unwrap();

        assert_eq!(read_to_string(written).unwrap().lines().count(), 1);
    }
}
