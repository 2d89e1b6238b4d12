use anyhow::{anyhow, Result};
use clap::Parser;
use phylomc_core::{
    domain::dtos::{likelihood::EvolutionModel, tree::Tree},
    use_cases::calculate_likelihood,
};
use phylomc_ports_lib::load_alignment;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub(crate) struct Arguments {
    /// Path to the tree file
    ///
    /// The file should be in Newick format, with a rooted binary tree.
    pub(super) tree_file_path: PathBuf,

    /// Path to the alignment file
    ///
    /// The file should be in FASTA format. Headers must match the tree
    /// terminal names.
    pub(super) alignment_file_path: PathBuf,

    /// Reroot the tree on this taxon before scoring
    #[arg(long)]
    pub(super) outgroup: Option<String>,

    /// Print the tree before the result
    #[arg(long, default_value = "false")]
    pub(super) show_tree: bool,
}

pub(crate) fn likelihood_cmd(args: Arguments) -> Result<()> {
    let mut tree =
        Tree::from_file(&args.tree_file_path).map_err(|err| anyhow!("{err}"))?;

    if let Some(outgroup) = &args.outgroup {
        tree.root_with_outgroup(outgroup)?;
    }

    let model = EvolutionModel::default();
    let sequences = load_alignment(&args.alignment_file_path)?;

    tree.clamp_sequences(&sequences, &model.codec)?;

    let likelihood = calculate_likelihood(&mut tree, &model)?;

    if args.show_tree {
        tree.pretty_print();
    }

    println!("{}", serde_yaml::to_string(&likelihood)?);

    Ok(())
}
