//! Kinds command handler

use super::Outcome;
use crate::error::Result;
use crate::output::OutputWriter;
use specspec_core::{dsl, Engine};

/// Handle the kinds command: every factory name a spec may call
pub fn handle_kinds(output: &mut OutputWriter) -> Result<Outcome> {
    let engine = Engine::new();
    let names = dsl::factory_names(&engine);
    output.list(&names)?;
    Ok(Outcome::Success)
}
