//! verify command - Check vocabulary invariants

use anyhow::{bail, Result};

use super::{load_store, Context};
use crate::core::types::FieldId;
use crate::verify::verify_field;

/// Verify one vocabulary, or every vocabulary in the store.
pub fn verify(ctx: &Context, field: Option<u32>) -> Result<()> {
    let store = load_store(ctx)?;
    let fields: Vec<FieldId> = match field {
        Some(f) => vec![FieldId(f)],
        None => store.fields(),
    };

    let mut total_issues = 0usize;
    for field in fields {
        let result = verify_field(&store, field);
        if result.ok {
            if !ctx.quiet {
                println!("field {}: ok", field);
            }
        } else {
            for issue in &result.issues {
                println!("field {}: {}", field, issue);
            }
            total_issues += result.issues.len();
        }
    }

    if total_issues > 0 {
        bail!("verification failed with {} issue(s)", total_issues);
    }
    Ok(())
}
