//! demo_containers - Show how container hierarchies are flattened.
//!
//! Reads an EAD file and prints every container of every component, first
//! as written and then after normalization, where each subcontainer points
//! directly at the root container of its hierarchy.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example demo_containers <filename.xml>
//! ```

use std::env;

use ead_rs::objects::Container;
use ead_rs::reader::parse_file;
use ead_rs::storage::normalize;

fn print_containers(containers: &[Container]) {
    println!(
        "{:<10} {:<10} {:<10} {:<8} {}",
        "Id", "Parent", "Type", "Value", "Label"
    );
    for container in containers {
        println!(
            "{:<10} {:<10} {:<10} {:<8} {}",
            container.id.as_deref().unwrap_or("-"),
            container.parent.as_deref().unwrap_or("-"),
            container.container_type.as_deref().unwrap_or("-"),
            container.value,
            container.display_label().unwrap_or_default()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <filename.xml>", args[0]);
        std::process::exit(1);
    }

    let ead = parse_file(&args[1])?;
    let mut containers: Vec<Container> = ead
        .iter_components()
        .flat_map(|component| {
            let containers = component.borrow().did.containers.clone();
            containers
        })
        .collect();

    println!("As written:");
    print_containers(&containers);
    println!();

    match normalize(&mut containers) {
        Ok(rewritten) => {
            println!("Normalized ({} rewritten):", rewritten);
            print_containers(&containers);
        }
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}
