//! demo_census - Count the digital objects of a finding aid by category.
//!
//! Reads an EAD file, takes a census of every `<dao>` in the description
//! tree and prints a count per category followed by the links of each
//! object and the component that holds it.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example demo_census <filename.xml>
//! ```

use std::env;

use ead_rs::census::census;
use ead_rs::objects::DaoCategory;
use ead_rs::reader::parse_file;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <filename.xml>", args[0]);
        std::process::exit(1);
    }

    let ead = parse_file(&args[1])?;
    let Some(archdesc) = ead.archdesc.as_ref() else {
        eprintln!("No <archdesc> in {}", args[1]);
        std::process::exit(1);
    };

    let result = census(archdesc);

    println!("{:>32} {:>8}", "Category", "Count");
    for category in DaoCategory::ALL {
        println!("{:>32} {:>8}", category.as_str(), result.bucket(category).count());
    }
    println!("{:>32} {:>8}", "total", result.total());
    println!();

    for dao in result.all().daos() {
        let dao = dao.borrow();
        let owner = dao
            .owner()
            .and_then(|component| {
                let id = component.borrow().id.clone();
                id
            })
            .unwrap_or_else(|| "(no id)".to_string());
        println!(
            "{:<12} {}",
            owner,
            dao.href.as_deref().unwrap_or("(no href)")
        );
    }

    Ok(())
}
