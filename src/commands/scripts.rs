//! Implementation of the `swarmctl scripts` command.

use crate::cli::ScriptsArgs;
use crate::error::{Result, SwarmError};
use crate::scripts::{HandleCheck, ScriptManifest};

/// Execute the `swarmctl scripts` command.
///
/// Without `--check`, prints the resolved load order. With it, reports the
/// handle's transitive dependencies and fails validation if any of them is
/// declared after the handle.
pub fn cmd_scripts(args: ScriptsArgs) -> Result<()> {
    let manifest = ScriptManifest::load(&args.manifest)?;

    match args.check {
        Some(handle) => {
            let check = manifest.check_handle(&handle)?;
            print_check(&check);
            if !check.is_satisfied() {
                return Err(SwarmError::ValidationError(format!(
                    "'{}' is declared before its dependencies: {}",
                    check.handle,
                    check.declared_after.join(", ")
                )));
            }
        }
        None => {
            let order = manifest.resolve()?;
            println!("Load order ({} scripts):", order.len());
            for (i, script) in order.iter().enumerate() {
                let placement = match (script.in_footer, script.promoted) {
                    (true, _) => "footer",
                    (false, true) => "header, moved from footer",
                    (false, false) => "header",
                };
                println!(
                    "  {:>2}. {:<28} {} ({})",
                    i + 1,
                    script.handle,
                    script.src,
                    placement
                );
            }
            if !manifest.external.is_empty() {
                println!();
                println!("External: {}", manifest.external.join(", "));
            }
        }
    }

    Ok(())
}

fn print_check(check: &HandleCheck) {
    println!("Handle: {}", check.handle);
    if check.dependencies.is_empty() {
        println!("Dependencies: (none)");
    } else {
        println!("Dependencies (load order): {}", check.dependencies.join(", "));
    }
    if !check.external.is_empty() {
        println!("External: {}", check.external.join(", "));
    }
    if check.is_satisfied() {
        println!("OK: every dependency is declared before '{}'.", check.handle);
    } else {
        println!(
            "Declared too late: {}",
            check.declared_after.join(", ")
        );
    }
}
