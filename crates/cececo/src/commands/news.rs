//! News command handler.

use tabled::Tabled;

use cececo_core::{FacetDimension, ListingScreen, NewsItem};

use crate::cli::NewsArgs;
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

#[derive(Tabled)]
struct NewsRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Impact")]
    impact: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl From<&NewsItem> for NewsRow {
    fn from(n: &NewsItem) -> Self {
        Self {
            date: n
                .published_at
                .map(|ts| ts.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            country: n.country_iso2.clone().unwrap_or_default(),
            title: output::truncate(&n.title, 60),
            impact: match (&n.impact_type, n.impact_score) {
                (Some(t), Some(s)) => format!("{t} ({s})"),
                (Some(t), None) => t.clone(),
                (None, Some(s)) => s.to_string(),
                (None, None) => String::new(),
            },
            tags: n.tags.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(ctx: &Ctx, args: NewsArgs) -> Result<(), CliError> {
    if args.limit == 0 {
        return Err(CliError::Validation {
            field: "limit".into(),
            reason: "must be at least 1".into(),
        });
    }
    let location = util::location(&ctx.global);
    let screen = ListingScreen::news(ctx.client.clone(), Some(args.limit), location.clone());
    util::apply_filters(&screen, &args.filters)?;

    let listing = util::applied(util::with_spinner(ctx, "Loading news", screen.load()).await)?;
    util::print_link(&ctx.global, location.as_ref());

    if args.facets {
        let out = util::render_facets(ctx, &screen)?;
        output::print_output(&out, ctx.global.quiet);
        return Ok(());
    }

    util::select_facets(&screen, FacetDimension::Tag, &args.tag);
    let items = screen.items();
    let out = output::render_list(
        ctx.output,
        &items,
        |n| NewsRow::from(n),
        |n| n.id.to_string(),
    )?;
    output::print_output(&out, ctx.global.quiet);

    if ctx.decorated() {
        let total = listing
            .total
            .unwrap_or_else(|| u64::try_from(listing.items.len()).unwrap_or(u64::MAX));
        let note = format!("Showing {} of {total} items", items.len());
        eprintln!("{}", output::dim(&note, ctx.color));
    }
    Ok(())
}
