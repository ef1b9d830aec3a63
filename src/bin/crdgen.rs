//! # CRD Generator
//!
//! Prints the `Companion` CustomResourceDefinition as YAML.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin crdgen > config/crd/bases/operator.kyma-project.io_companions.yaml
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use companion_manager::crd::Companion;
use kube::CustomResourceExt;

fn main() {
    let crd = Companion::crd();

    match serde_yaml::to_string(&crd) {
        Ok(yaml) => {
            println!("# This file is auto-generated by crdgen");
            println!("# DO NOT EDIT THIS FILE MANUALLY");
            println!("---");
            print!("{yaml}");
        }
        Err(e) => {
            eprintln!("Failed to serialize CRD to YAML: {e}");
            std::process::exit(1);
        }
    }
}
