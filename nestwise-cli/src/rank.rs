//! The `rank` command: load candidates, attach travel times, score
//! and print.

use std::fs;

use camino::Utf8Path;
use eyre::WrapErr;
use geo::Coord;
use nestwise_analytics::{AnalyticsEngine, AnalyticsReport};
use nestwise_core::{AnalyticsConfig, Candidate, KeyValueStore, MemoryStore};
use nestwise_travel::{
    DistanceSource, HttpDistanceSource, NoExternalSource, TravelTimeCache, TravelTimeCalculator,
};

use crate::cli::{CacheArgs, RankArgs};
use crate::store::FileStore;

pub fn run(args: &RankArgs) -> eyre::Result<()> {
    let mut candidates = load_candidates(&args.input)?;

    let mut engine = AnalyticsEngine::new();
    if let Some(path) = &args.config {
        let config = load_config(path)?;
        let findings = engine.update_config(config);
        for finding in &findings {
            eprintln!("warning: {finding}");
        }
        if !findings.is_empty() {
            eprintln!("warning: falling back to the default configuration");
        }
    }

    let origin = match (args.work_lat, args.work_lng) {
        (Some(lat), Some(lng)) => Some(Coord { x: lng, y: lat }),
        _ => None,
    };
    if origin.is_some() {
        let mut calculator = build_calculator(args)?;
        calculator.annotate(origin, &mut candidates);
    }

    let report = engine.calculate(&mut candidates)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

pub fn clear_cache(args: &CacheArgs) -> eyre::Result<()> {
    let store = FileStore::open(&args.cache_dir)
        .wrap_err_with(|| format!("cannot open cache directory {}", args.cache_dir))?;
    let mut cache = TravelTimeCache::with_system_clock(store);
    let entries = cache.len();
    cache.clear();
    println!("cleared {entries} cached travel-time entries");
    Ok(())
}

fn load_candidates(path: &Utf8Path) -> eyre::Result<Vec<Candidate>> {
    let raw = fs::read_to_string(path).wrap_err_with(|| format!("cannot read {path}"))?;
    let candidates: Vec<Candidate> =
        serde_json::from_str(&raw).wrap_err_with(|| format!("cannot parse {path}"))?;
    for candidate in &candidates {
        candidate
            .validate()
            .wrap_err_with(|| format!("candidate {} is invalid", candidate.id))?;
    }
    Ok(candidates)
}

fn load_config(path: &Utf8Path) -> eyre::Result<AnalyticsConfig> {
    let raw = fs::read_to_string(path).wrap_err_with(|| format!("cannot read {path}"))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("cannot parse {path}"))
}

fn build_calculator(args: &RankArgs) -> eyre::Result<TravelTimeCalculator> {
    let store: Box<dyn KeyValueStore> = match &args.cache_dir {
        Some(dir) => Box::new(
            FileStore::open(dir)
                .wrap_err_with(|| format!("cannot open cache directory {dir}"))?,
        ),
        None => Box::new(MemoryStore::new()),
    };
    let cache = TravelTimeCache::with_system_clock(store);

    let source: Box<dyn DistanceSource> = match &args.osrm_url {
        Some(url) if !args.offline => Box::new(
            HttpDistanceSource::new(url.clone())
                .wrap_err_with(|| format!("cannot build travel-time client for {url}"))?,
        ),
        _ => Box::new(NoExternalSource),
    };

    Ok(TravelTimeCalculator::new(source, cache))
}

fn render_report(report: &AnalyticsReport) -> String {
    let mut out = String::new();
    out.push_str("rank  overall  commute   cost  amenities   size  name\n");
    for entry in &report.ranking {
        let bundle = report.scores.get(&entry.candidate_id);
        let metric = |id: &str| {
            bundle
                .and_then(|b| b.plugin_score(id))
                .map_or_else(|| "-".to_owned(), |score| format!("{score:.1}"))
        };
        out.push_str(&format!(
            "{:<4}  {:>7.1}  {:>7}  {:>5}  {:>9}  {:>5}  {}\n",
            entry.rank,
            entry.overall,
            metric("commute-score"),
            metric("cost-score"),
            metric("amenities-score"),
            metric("size-score"),
            entry.name
        ));
    }
    if !report.insights.is_empty() {
        out.push_str("\ninsights:\n");
        for insight in &report.insights {
            out.push_str(&format!("  - {insight}\n"));
        }
    }
    if !report.recommendations.is_empty() {
        out.push_str("\nrecommendations:\n");
        for recommendation in &report.recommendations {
            out.push_str(&format!("  - {recommendation}\n"));
        }
    }
    out
}
