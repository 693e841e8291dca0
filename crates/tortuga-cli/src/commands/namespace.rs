//! `tortuga namespace`: List the classes of a namespace across references.

use anyhow::Context as _;
use std::path::Path;

use super::{print_type, Context, Outcome, TypeReport};

pub fn execute(ctx: &mut Context, module: &Path, namespace: &str) -> anyhow::Result<Outcome> {
    let resolver = ctx.resolver();
    let root = resolver
        .load_root(module)
        .with_context(|| format!("Cannot open module {}", module.display()))?;

    let found = resolver.resolve_namespace_types(root.as_ref(), namespace)?;

    if ctx.json {
        let reports: Vec<TypeReport> = found.iter().map(TypeReport::from).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else if found.is_empty() {
        ctx.out.stderr_warning(&format!(
            "No classes in namespace '{}' outside {}",
            namespace,
            module.display()
        ));
    } else {
        for ty in &found {
            print_type(&mut ctx.out, ty);
        }
        ctx.out.newline();
        ctx.out.warning(&format!("{} ", found.len()));
        ctx.out.plain(if found.len() == 1 { "class" } else { "classes" });
        ctx.out.newline();
    }

    Ok(if found.is_empty() {
        Outcome::NotFound
    } else {
        Outcome::Success
    })
}
