//! Project and startup command handlers.
//!
//! Both subcommands share one screen type; only the listing kind differs.
//! `--matches` opens every listed entry's match panel at once, so panels
//! load concurrently and fail independently.

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tabled::Tabled;

use cececo_api::CreateProjectRequest;
use cececo_core::{
    CoreError, EntryStatus, FacetDimension, MemoryLocation, Project, ProjectKind, ProjectScreen,
    ScoredMatch, SubResourceEntry,
};

use crate::cli::{FacetArgs, FilterArgs, MatchArgs, OutputFormat, ProjectsArgs, ProjectsCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Stage")]
    stage: String,
}

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Investor")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Why")]
    why: String,
}

fn match_rows(matches: &[ScoredMatch]) -> Vec<MatchRow> {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| MatchRow {
            rank: i + 1,
            name: m.investor.name.clone(),
            kind: m.investor.investor_type.clone(),
            score: format!("{:.0}", m.score_100.unwrap_or(m.score)),
            why: output::truncate(&m.reason_labels().join("; "), 60),
        })
        .collect()
}

fn detail(p: &Project) -> String {
    let mut lines = vec![
        format!("ID:       {}", p.id),
        format!("Kind:     {}", p.kind),
        format!("Title:    {}", p.title),
        format!(
            "Country:  {}",
            p.country
                .as_ref()
                .map_or_else(|| format!("#{}", p.country_id), |c| c.name.clone())
        ),
        format!("Sector:   {}", p.sector.as_deref().unwrap_or("-")),
        format!("Stage:    {}", p.stage.as_deref().unwrap_or("-")),
    ];
    if let Some(ref w) = p.website {
        lines.push(format!("Website:  {w}"));
    }
    lines.push(String::new());
    lines.push(p.summary.clone());
    lines.join("\n")
}

// ── Structured output for `--matches` ───────────────────────────────

/// One project with the state of its match panel.
#[derive(Debug, Serialize)]
struct ProjectMatches {
    project: Project,
    strict: bool,
    total: usize,
    matches: Vec<ScoredMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ProjectMatches {
    fn new(project: Project, entry: &SubResourceEntry, preview: usize) -> Self {
        Self {
            project,
            strict: entry.strict,
            total: entry.total(),
            matches: entry.visible(preview).to_vec(),
            error: entry.error.as_ref().map(ToString::to_string),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Ctx, kind: ProjectKind, args: ProjectsArgs) -> Result<(), CliError> {
    match args.command {
        ProjectsCommand::List {
            filters,
            facets,
            matches,
            match_opts,
        } => list(ctx, kind, &filters, &facets, matches, &match_opts).await,

        ProjectsCommand::Matches { id, match_opts } => show_matches(ctx, kind, id, &match_opts).await,

        ProjectsCommand::Create {
            title,
            summary,
            country,
            sector,
            stage,
            website,
        } => {
            let title = title.trim().to_owned();
            let summary = summary.trim().to_owned();
            if title.is_empty() || summary.is_empty() {
                return Err(CliError::Validation {
                    field: (if title.is_empty() { "title" } else { "summary" }).into(),
                    reason: "must not be empty".into(),
                });
            }
            let req = CreateProjectRequest {
                kind,
                country_id: country,
                title,
                summary,
                sector: sector.filter(|s| !s.trim().is_empty()),
                stage: stage.filter(|s| !s.trim().is_empty()),
                website: website.filter(|s| !s.trim().is_empty()),
            };
            let created = ctx.client.create_project(&req).await?;
            tracing::info!(id = created.id, %kind, "entry created");
            let out = output::render_single(ctx.output, &created, detail, |p| p.id.to_string())?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }
    }
}

fn label(kind: ProjectKind) -> &'static str {
    match kind {
        ProjectKind::Project => "projects",
        ProjectKind::Startup => "startups",
    }
}

async fn list(
    ctx: &Ctx,
    kind: ProjectKind,
    filters: &FilterArgs,
    facets: &FacetArgs,
    with_matches: bool,
    match_opts: &MatchArgs,
) -> Result<(), CliError> {
    let location = util::location(&ctx.global);
    let screen = ProjectScreen::new(ctx.client.clone(), kind, &ctx.hub, location.clone());
    util::apply_filters(screen.listing(), filters)?;

    let message = format!("Loading {}", label(kind));
    let listing = util::applied(util::with_spinner(ctx, &message, screen.load()).await)?;
    util::print_link(&ctx.global, location.as_ref());

    if facets.facets {
        let out = util::render_facets(ctx, screen.listing())?;
        output::print_output(&out, ctx.global.quiet);
        return Ok(());
    }

    util::select_facets(screen.listing(), FacetDimension::Sector, &facets.sector);
    util::select_facets(screen.listing(), FacetDimension::Stage, &facets.stage);
    let items = screen.listing().items();

    if !with_matches {
        let out = output::render_list(
            ctx.output,
            &items,
            |p| ProjectRow {
                id: p.id,
                title: output::truncate(&p.title, 50),
                country: listing.country_name(p.country_id),
                sector: p.sector.clone().unwrap_or_default(),
                stage: p.stage.clone().unwrap_or_default(),
            },
            |p| p.id.to_string(),
        )?;
        output::print_output(&out, ctx.global.quiet);
        return Ok(());
    }

    let cache = screen.matches();
    let open_all = join_all(items.iter().map(|p| async move {
        cache.set_mode(p.id, match_opts.strict).await;
        cache.toggle_open(p.id).await;
    }));
    util::with_spinner(ctx, "Loading matches", open_all).await;
    if match_opts.all {
        for p in &items {
            cache.toggle_show_all(p.id);
        }
    }

    let preview = cache.preview();
    let panels: Vec<(Project, Arc<SubResourceEntry>)> = items
        .into_iter()
        .map(|p| {
            let entry = cache.entry(p.id).unwrap_or_default();
            (p, entry)
        })
        .collect();

    if ctx.output == OutputFormat::Table {
        let mut sections = Vec::with_capacity(panels.len());
        for (project, entry) in &panels {
            let title = format!(
                "{} · {} ({})",
                project.id,
                project.title,
                listing.country_name(project.country_id)
            );
            sections.push(panel_text(ctx, &title, entry, preview));
        }
        output::print_output(&sections.join("\n\n"), ctx.global.quiet);
        return Ok(());
    }

    let rows: Vec<ProjectMatches> = panels
        .into_iter()
        .map(|(p, entry)| ProjectMatches::new(p, &entry, preview))
        .collect();
    let out = output::render_list(
        ctx.output,
        &rows,
        |r| ProjectRow {
            id: r.project.id,
            title: r.project.title.clone(),
            country: listing.country_name(r.project.country_id),
            sector: r.project.sector.clone().unwrap_or_default(),
            stage: r.project.stage.clone().unwrap_or_default(),
        },
        |r| {
            let ids: Vec<String> = r.matches.iter().map(|m| m.investor.id.to_string()).collect();
            format!("{}\t{}", r.project.id, ids.join(","))
        },
    )?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

/// Heading, match table or inline error, and the "Showing X of Y" line.
fn panel_text(ctx: &Ctx, title: &str, entry: &SubResourceEntry, preview: usize) -> String {
    let mut out = vec![output::heading(title, ctx.color)];
    match entry.status {
        EntryStatus::Errored => {
            let message = entry
                .error
                .as_ref()
                .map_or_else(|| "failed to load matches".to_owned(), ToString::to_string);
            out.push(output::failure(&message, ctx.color));
        }
        _ if entry.total() == 0 => out.push(output::dim("No matching investors", ctx.color)),
        _ => {
            out.push(output::render_table(&match_rows(entry.visible(preview))));
            if let Some(summary) = entry.summary(preview) {
                out.push(output::dim(&summary, ctx.color));
            }
        }
    }
    out.join("\n")
}

async fn show_matches(
    ctx: &Ctx,
    kind: ProjectKind,
    id: u32,
    match_opts: &MatchArgs,
) -> Result<(), CliError> {
    let screen = ProjectScreen::new(
        ctx.client.clone(),
        kind,
        &ctx.hub,
        Arc::new(MemoryLocation::new("")),
    );
    let cache = screen.matches();
    cache.set_mode(id, match_opts.strict).await;
    util::with_spinner(ctx, "Loading matches", cache.toggle_open(id)).await;
    if match_opts.all {
        cache.toggle_show_all(id);
    }

    let entry = cache.entry(id).unwrap_or_default();
    if entry.status == EntryStatus::Errored {
        return Err(match entry.error.clone() {
            Some(e) if e.status() == Some(404) => CliError::NotFound {
                resource_type: label(kind).trim_end_matches('s').into(),
                identifier: id.to_string(),
                list_command: format!("{} list", label(kind)),
            },
            Some(e) => e.into(),
            None => CoreError::Api {
                message: "failed to load matches".into(),
                status: None,
            }
            .into(),
        });
    }

    let preview = cache.preview();
    let visible = entry.visible(preview);
    let mut out = output::render_rows(
        ctx.output,
        visible,
        || match_rows(visible),
        |m| m.investor.id.to_string(),
    )?;
    if ctx.output == OutputFormat::Table {
        if let Some(summary) = entry.summary(preview) {
            out.push('\n');
            out.push_str(&output::dim(&summary, ctx.color));
        }
    }
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scored(name: &str, score_100: f64, reasons: &[(&str, f64)]) -> ScoredMatch {
        serde_json::from_value(serde_json::json!({
            "investor": { "id": 1, "name": name, "investor_type": "fund" },
            "score": score_100,
            "score_100": score_100,
            "reason_points": reasons
                .iter()
                .map(|(l, p)| serde_json::json!({ "label": l, "points": p }))
                .collect::<Vec<_>>(),
        }))
        .unwrap()
    }

    #[test]
    fn match_rows_are_ranked_in_server_order() {
        let rows = match_rows(&[
            scored("Sahel Solar Fund", 82.0, &[("Sector match", 40.0)]),
            scored("Green Angels", 64.4, &[]),
        ]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].score, "82");
        assert_eq!(rows[0].why, "Sector match (+40)");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].score, "64");
    }

    #[test]
    fn label_names_the_listing() {
        assert_eq!(label(ProjectKind::Startup), "startups");
        assert_eq!(label(ProjectKind::Project), "projects");
    }
}
