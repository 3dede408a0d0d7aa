//! Investor command handlers.

use tabled::Tabled;

use cececo_api::CreateInvestorRequest;
use cececo_core::{FacetDimension, FilterField, Investor, InvestorType, ListingScreen};

use crate::cli::{FacetArgs, FilterArgs, InvestorsArgs, InvestorsCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InvestorRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Sectors")]
    sectors: String,
    #[tabled(rename = "Stages")]
    stages: String,
    #[tabled(rename = "Ticket")]
    ticket: String,
    #[tabled(rename = "Countries")]
    countries: String,
}

impl From<&Investor> for InvestorRow {
    fn from(i: &Investor) -> Self {
        Self {
            id: i.id,
            name: i.name.clone(),
            kind: i.investor_type.clone(),
            sectors: output::truncate(i.focus_sectors.as_deref().unwrap_or_default(), 40),
            stages: i.stages.clone().unwrap_or_default(),
            ticket: ticket_range(i.ticket_min, i.ticket_max),
            countries: i
                .countries
                .iter()
                .map(|c| c.iso2.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// `min–max`, `≥ min`, `≤ max`, or empty.
fn ticket_range(min: Option<i64>, max: Option<i64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{}–{}", compact_amount(lo), compact_amount(hi)),
        (Some(lo), None) => format!("≥ {}", compact_amount(lo)),
        (None, Some(hi)) => format!("≤ {}", compact_amount(hi)),
        (None, None) => String::new(),
    }
}

fn compact_amount(n: i64) -> String {
    match n {
        n if n >= 1_000_000 && n % 1_000_000 == 0 => format!("{}M", n / 1_000_000),
        n if n >= 1_000 && n % 1_000 == 0 => format!("{}k", n / 1_000),
        n => n.to_string(),
    }
}

fn detail(i: &Investor) -> String {
    let mut lines = vec![
        format!("ID:        {}", i.id),
        format!("Name:      {}", i.name),
        format!("Type:      {}", i.investor_type),
        format!("Sectors:   {}", i.focus_sectors.as_deref().unwrap_or("-")),
        format!("Stages:    {}", i.stages.as_deref().unwrap_or("-")),
    ];
    let ticket = ticket_range(i.ticket_min, i.ticket_max);
    if !ticket.is_empty() {
        lines.push(format!("Ticket:    {ticket}"));
    }
    if let Some(ref w) = i.website {
        lines.push(format!("Website:   {w}"));
    }
    if let Some(ref e) = i.contact_email {
        lines.push(format!("Email:     {e}"));
    }
    if !i.countries.is_empty() {
        let names: Vec<&str> = i.countries.iter().map(|c| c.name.as_str()).collect();
        lines.push(format!("Countries: {}", names.join(", ")));
    }
    if let Some(ts) = i.created_at {
        lines.push(format!("Created:   {}", ts.format("%Y-%m-%d %H:%M UTC")));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Ctx, args: InvestorsArgs) -> Result<(), CliError> {
    match args.command {
        InvestorsCommand::List {
            filters,
            investor_type,
            facets,
        } => list(ctx, &filters, investor_type.as_deref(), &facets).await,

        InvestorsCommand::Create {
            name,
            investor_type,
            sectors,
            stages,
            ticket_min,
            ticket_max,
            website,
            email,
            countries,
        } => {
            let name = name.trim().to_owned();
            if name.is_empty() {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "must not be empty".into(),
                });
            }
            if let (Some(lo), Some(hi)) = (ticket_min, ticket_max) {
                if lo > hi {
                    return Err(CliError::Validation {
                        field: "ticket-max".into(),
                        reason: format!("{hi} is below the minimum {lo}"),
                    });
                }
            }
            let investor_type: InvestorType =
                investor_type.parse().map_err(|_| CliError::Validation {
                    field: "type".into(),
                    reason: format!("unknown investor type '{investor_type}'"),
                })?;

            let req = CreateInvestorRequest {
                name,
                investor_type,
                focus_sectors: non_empty(sectors),
                stages: non_empty(stages),
                ticket_min,
                ticket_max,
                website: non_empty(website),
                contact_email: non_empty(email),
                country_ids: countries,
            };
            let created = ctx.client.create_investor(&req).await?;
            tracing::info!(id = created.id, "investor created");
            let out = output::render_single(ctx.output, &created, detail, |i| i.id.to_string())?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }
    }
}

async fn list(
    ctx: &Ctx,
    filters: &FilterArgs,
    investor_type: Option<&str>,
    facets: &FacetArgs,
) -> Result<(), CliError> {
    let location = util::location(&ctx.global);
    let screen = ListingScreen::investors(ctx.client.clone(), location.clone());
    util::apply_filters(&screen, filters)?;
    if let Some(t) = investor_type {
        screen.set_field(FilterField::InvestorType, t);
    }

    let listing = util::applied(util::with_spinner(ctx, "Loading investors", screen.load()).await)?;
    util::print_link(&ctx.global, location.as_ref());

    if facets.facets {
        let out = util::render_facets(ctx, &screen)?;
        output::print_output(&out, ctx.global.quiet);
        return Ok(());
    }

    util::select_facets(&screen, FacetDimension::Sector, &facets.sector);
    util::select_facets(&screen, FacetDimension::Stage, &facets.stage);
    let items = screen.items();

    let out = output::render_list(
        ctx.output,
        &items,
        |i| InvestorRow::from(i),
        |i| i.id.to_string(),
    )?;
    output::print_output(&out, ctx.global.quiet);
    if ctx.decorated() && items.len() != listing.items.len() {
        let note = format!("Showing {} of {} investors", items.len(), listing.items.len());
        eprintln!("{}", output::dim(&note, ctx.color));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
