use internship_aggregator_lib::{build_cache, export, logger, query, AppConfig};
use internship_aggregator_lib::listing::is_sample_set;

use std::error::Error;
use std::fs::File;
use log::{info, warn};
use chrono::Utc;

fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    logger::init();
    info!("Starting internship aggregator...");

    let config = AppConfig::from_env()?;
    let output_csv = std::env::args().nth(1).unwrap_or_else(|| "internships.csv".to_string());

    let cache = build_cache(&config);
    let listings = cache.get_listings();

    if is_sample_set(&listings) {
        warn!("No source returned listings; exporting sample data instead.");
    }

    let summary = query::summarize(&listings, cache.last_refreshed().unwrap_or_else(Utc::now));
    info!(
        "{} unique listings from [{}] across {} companies",
        summary.total_listings,
        summary.sources.join(", "),
        summary.companies.len()
    );

    let file = File::create(&output_csv)?;
    export::write_csv(&listings, file)?;

    info!("Wrote {} listings to {}", listings.len(), output_csv);
    Ok(())
}
