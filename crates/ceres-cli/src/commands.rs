use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use ceres_cli::pipeline::{EnrichPlan, IdentityStep, run_plan};
use ceres_enrich::{EventSource, Granularity, eventize};
use ceres_ingest::{read_csv_table, read_json_items, write_csv_table};

use crate::cli::{EnrichArgs, EventizeArgs};
use crate::types::{EnrichResult, EventizeResult};

pub fn run_enrich(args: &EnrichArgs) -> Result<EnrichResult> {
    let span = info_span!("enrich", input = %args.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let table = read_csv_table(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let rows_in = table.height();
    info!(rows = rows_in, columns = table.width(), "loaded commit table");

    let plan = plan_from_args(args);
    let (mut table, steps) = run_plan(table, &plan)?;

    if let Some(path) = &args.output {
        write_csv_table(&mut table, path)
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), rows = table.height(), "wrote enriched table");
    }
    info!(
        steps = steps.len(),
        duration_ms = start.elapsed().as_millis(),
        "enrichment complete"
    );

    Ok(EnrichResult {
        input: args.input.clone(),
        output: args.output.clone(),
        rows_in,
        steps,
        table,
        preview: args.preview,
    })
}

pub fn run_eventize(args: &EventizeArgs) -> Result<EventizeResult> {
    let span = info_span!("eventize", items = %args.items.display());
    let _guard = span.enter();

    let items = read_json_items(&args.items)
        .with_context(|| format!("read {}", args.items.display()))?;
    let source = EventSource::from(args.source);
    let granularity = Granularity::from(args.granularity);
    let mut table = eventize(source, &items, granularity)
        .with_context(|| format!("eventize {source} items"))?;
    info!(
        items = items.len(),
        events = table.height(),
        %source,
        ?granularity,
        "eventized items"
    );

    if let Some(path) = &args.output {
        write_csv_table(&mut table, path)
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), rows = table.height(), "wrote event table");
    }

    Ok(EventizeResult {
        items: items.len(),
        output: args.output.clone(),
        table,
        preview: args.preview,
    })
}

fn plan_from_args(args: &EnrichArgs) -> EnrichPlan {
    EnrichPlan {
        fill_missing: args.fill_missing.clone(),
        filters: args.filters.clone(),
        date_columns: args.format_dates.clone(),
        pair_programming: args.pair_programming.clone(),
        time_difference: args.time_difference.clone(),
        identities: args.uuids.as_ref().map(|map_path| IdentityStep {
            map_path: map_path.clone(),
            keys: args.uuid_keys.clone(),
        }),
        file_type: args.file_type.clone(),
    }
}
