//! `tortuga type`: Resolve one type by fully-qualified name.

use anyhow::Context as _;
use std::path::Path;

use super::{print_type, Context, Outcome, TypeReport};

pub fn execute(ctx: &mut Context, module: &Path, full_name: &str) -> anyhow::Result<Outcome> {
    let resolver = ctx.resolver();
    let root = resolver
        .load_root(module)
        .with_context(|| format!("Cannot open module {}", module.display()))?;

    let found = resolver.resolve_type(root.as_ref(), full_name)?;

    if ctx.json {
        let report = found.as_ref().map(TypeReport::from);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &found {
            Some(ty) => print_type(&mut ctx.out, ty),
            None => ctx.out.stderr_warning(&format!(
                "Type '{}' not found in {} or the modules it references",
                full_name,
                module.display()
            )),
        }
    }

    Ok(if found.is_some() {
        Outcome::Success
    } else {
        Outcome::NotFound
    })
}
