//! Country reference list.

use tabled::Tabled;

use cececo_core::Country;

use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

#[derive(Tabled)]
struct CountryRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ISO")]
    iso2: String,
    #[tabled(rename = "Region")]
    region: String,
}

impl From<&Country> for CountryRow {
    fn from(c: &Country) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            iso2: c.iso2.clone(),
            region: c.region.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(ctx: &Ctx) -> Result<(), CliError> {
    let countries = util::with_spinner(ctx, "Loading countries", ctx.client.list_countries()).await?;
    let out = output::render_list(
        ctx.output,
        &countries,
        |c| CountryRow::from(c),
        |c| c.id.to_string(),
    )?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
