//! Shared helpers for command handlers.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use cececo_core::{
    FacetDimension, Faceted, FilterField, Listing, ListingScreen, LoadOutcome, Location,
    MemoryLocation, ScreenSource, facet,
};

use crate::cli::{FilterArgs, GlobalOpts};
use crate::error::CliError;

use super::Ctx;

/// Location seeded from `--link`, or empty.
pub fn location(global: &GlobalOpts) -> Arc<MemoryLocation> {
    Arc::new(MemoryLocation::new(global.link.as_deref().unwrap_or_default()))
}

/// Emit the shareable link for the current location on stderr.
pub fn print_link(global: &GlobalOpts, location: &dyn Location) {
    if global.print_link {
        eprintln!("?{}", location.query());
    }
}

/// Apply `--query` / `--country` on top of whatever `--link` seeded.
pub fn apply_filters<S: ScreenSource>(
    screen: &ListingScreen<S>,
    filters: &FilterArgs,
) -> Result<(), CliError> {
    if let Some(ref q) = filters.query {
        screen.set_field(FilterField::Q, q);
    }
    if let Some(ref country) = filters.country {
        let trimmed = country.trim();
        if !trimmed.is_empty() && trimmed.parse::<u32>().is_err() {
            return Err(CliError::Validation {
                field: "country".into(),
                reason: format!("expected a numeric country id, got '{trimmed}'"),
            });
        }
        screen.set_field(FilterField::CountryId, trimmed);
    }
    Ok(())
}

/// Run `fut` behind a spinner when output is decorated.
pub async fn with_spinner<F: Future>(ctx: &Ctx, message: &str, fut: F) -> F::Output {
    if !ctx.decorated() {
        return fut.await;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    pb.finish_and_clear();
    out
}

/// Unwrap a load outcome into the applied listing.
pub fn applied<T>(outcome: LoadOutcome<T>) -> Result<Arc<Listing<T>>, CliError> {
    match outcome {
        LoadOutcome::Applied(listing) => Ok(listing),
        LoadOutcome::Failed(e) => Err(e.into()),
        LoadOutcome::Superseded => Err(CliError::Api {
            message: "load was superseded by a newer request".into(),
            status: None,
        }),
    }
}

/// Select each requested facet value once.
pub fn select_facets<S: ScreenSource>(
    screen: &ListingScreen<S>,
    dimension: FacetDimension,
    values: &[String],
) {
    let wanted: BTreeSet<String> = values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect();
    for value in wanted {
        if !screen.selected().is_selected(dimension, &value) {
            screen.toggle_facet(dimension, &value);
        }
    }
}

/// Facet values grouped by dimension, for `--facets`.
#[derive(Debug, serde::Serialize)]
pub struct FacetRow {
    pub dimension: String,
    pub value: String,
    pub count: usize,
}

#[derive(tabled::Tabled)]
struct FacetTableRow {
    #[tabled(rename = "Facet")]
    dimension: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Items")]
    count: usize,
}

fn facet_table_row(r: &FacetRow) -> FacetTableRow {
    FacetTableRow {
        dimension: r.dimension.clone(),
        value: r.value.clone(),
        count: r.count,
    }
}

/// Every facet value of the loaded list with the number of items carrying it.
pub fn facet_rows<S: ScreenSource>(screen: &ListingScreen<S>, items: &[S::Item]) -> Vec<FacetRow> {
    let index = screen.facets();
    index
        .dimensions()
        .flat_map(|dim| {
            index.values(dim).iter().map(move |value| FacetRow {
                dimension: dim.to_string(),
                value: value.clone(),
                count: items.iter().filter(|item| carries(*item, dim, value)).count(),
            })
        })
        .collect()
}

fn carries<T: Faceted>(item: &T, dimension: FacetDimension, value: &str) -> bool {
    item.facet_raw(dimension)
        .is_some_and(|raw| facet::split_tags(raw).any(|tag| facet::same_tag(tag, value)))
}

/// Render `--facets` output for a loaded screen.
pub fn render_facets<S: ScreenSource>(
    ctx: &Ctx,
    screen: &ListingScreen<S>,
) -> Result<String, CliError> {
    let state = screen.state();
    let items = state.listing().map(|l| l.items.as_slice()).unwrap_or_default();
    let rows = facet_rows(screen, items);
    crate::output::render_list(ctx.output, &rows, facet_table_row, |r| {
        format!("{}={}", r.dimension, r.value)
    })
}
