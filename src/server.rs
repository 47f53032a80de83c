use actix_web::{get, post, route, web, App, HttpResponse, HttpServer, Responder};
use actix_cors::Cors;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use log::{error, info, warn};

use internship_aggregator_lib::{build_cache, export, logger, query, AppConfig, ListingCache, ListingPage, ListingQuery};
use internship_aggregator_lib::listing::{is_sample_set, Listing};
use internship_aggregator_lib::subscription::{self, HttpMailer, LogMailer, Mailer, SubscriptionError, SubscriptionRequest};
use internship_aggregator_lib::trending::{self, ChartRenderer, SvgChartRenderer};

const SAMPLE_NOTICE: &str = "Showing sample data for demonstration. Real-time data will appear when available.";

/// The chart is redrawn on reads this soon after a cache refresh, and on
/// every read that serves the sample set.
const CHART_WINDOW_SECS: i64 = 60;

struct AppState {
    cache: Arc<ListingCache>,
    mailer: Arc<dyn Mailer>,
    chart: Arc<dyn ChartRenderer>,
}

#[derive(Deserialize)]
struct ListingParams {
    #[serde(default)]
    search: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    duration: String,
    #[serde(default)]
    stipend: String,
    page: Option<String>,
}

impl ListingParams {
    fn split(self) -> (ListingQuery, usize) {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1);
        let filters = ListingQuery {
            search: self.search,
            location: self.location,
            duration: self.duration,
            stipend: self.stipend,
        };
        (filters, page)
    }
}

#[derive(Serialize)]
struct ListingsResponse {
    #[serde(flatten)]
    page: ListingPage,
    notice: Option<&'static str>,
}

fn load_listings(cache: &ListingCache, chart: &dyn ChartRenderer) -> Vec<Listing> {
    let listings = cache.get_listings();

    if cache.refreshed_within(Duration::seconds(CHART_WINDOW_SECS)) || is_sample_set(&listings) {
        if let Err(e) = trending::generate_trending_chart(chart, &listings) {
            error!("Failed to generate trending chart: {}", e);
        }
    }
    listings
}

#[get("/api/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json("ok")
}

#[get("/api/internships")]
async fn list_internships(params: web::Query<ListingParams>, data: web::Data<AppState>) -> impl Responder {
    let (filters, page) = params.into_inner().split();
    let cache = Arc::clone(&data.cache);
    let chart = Arc::clone(&data.chart);

    match web::block(move || load_listings(&cache, chart.as_ref())).await {
        Ok(listings) => {
            let notice = is_sample_set(&listings).then_some(SAMPLE_NOTICE);
            HttpResponse::Ok().json(ListingsResponse {
                page: query::query(&listings, &filters, page),
                notice,
            })
        }
        Err(e) => {
            error!("Listing read failed: {}", e);
            HttpResponse::InternalServerError().json("Failed to load listings")
        }
    }
}

#[get("/api/summary")]
async fn summary(data: web::Data<AppState>) -> impl Responder {
    let cache = Arc::clone(&data.cache);
    match web::block(move || {
        let listings = cache.get_listings();
        let updated = cache.last_refreshed().unwrap_or_else(Utc::now);
        query::summarize(&listings, updated)
    })
    .await
    {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => {
            error!("Summary failed: {}", e);
            HttpResponse::InternalServerError().json("Failed to load listings")
        }
    }
}

#[get("/download")]
async fn download_csv(data: web::Data<AppState>) -> impl Responder {
    let cache = Arc::clone(&data.cache);
    let csv = web::block(move || export::to_csv_bytes(&cache.get_listings())).await;

    match csv {
        Ok(Ok(bytes)) => HttpResponse::Ok()
            .content_type("text/csv")
            .append_header(("Content-Disposition", "attachment;filename=internships.csv"))
            .body(bytes),
        Ok(Err(e)) => {
            error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().body("Export failed.")
        }
        Err(e) => {
            error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().body("Export failed.")
        }
    }
}

#[post("/subscribe")]
async fn subscribe(form: web::Form<SubscriptionRequest>, data: web::Data<AppState>) -> impl Responder {
    let request = form.into_inner();
    let mailer = Arc::clone(&data.mailer);

    match web::block(move || subscription::subscribe(mailer.as_ref(), &request)).await {
        Ok(Ok(())) => HttpResponse::Ok().json(serde_json::json!({
            "status": "success",
            "message": "Subscribed successfully! Check your email."
        })),
        Ok(Err(e @ (SubscriptionError::MissingEmail | SubscriptionError::InvalidEmail))) => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "status": "error",
                "message": e.to_string()
            }))
        }
        Ok(Err(e)) => HttpResponse::BadGateway().json(serde_json::json!({
            "status": "error",
            "message": e.to_string()
        })),
        Err(e) => {
            error!("Subscription task failed: {}", e);
            HttpResponse::InternalServerError().json("Subscription failed")
        }
    }
}

#[route("/refresh", method = "GET", method = "POST")]
async fn refresh_data(data: web::Data<AppState>) -> impl Responder {
    let cache = Arc::clone(&data.cache);
    match web::block(move || cache.force_refresh().len()).await {
        Ok(count) => {
            info!("Manual refresh completed with {} listings", count);
            HttpResponse::Ok().json(serde_json::json!({
                "status": "success",
                "count": count,
                "message": format!("Data refreshed! Found {} jobs from multiple sources.", count)
            }))
        }
        Err(e) => {
            error!("Manual refresh failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "status": "error",
                "message": format!("Error refreshing data: {}", e)
            }))
        }
    }
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(list_internships)
        .service(summary)
        .service(download_csv)
        .service(subscribe)
        .service(refresh_data);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    logger::init();

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let mailer: Arc<dyn Mailer> = match &config.mail.api_url {
        Some(url) => Arc::new(HttpMailer::new(url.clone(), config.mail.api_key.clone(), config.mail.sender.clone())),
        None => {
            warn!("MAIL_API_URL not set; subscription emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    std::fs::create_dir_all(&config.static_dir)?;
    let state = web::Data::new(AppState {
        cache: Arc::new(build_cache(&config)),
        mailer,
        chart: Arc::new(SvgChartRenderer::new(&config.static_dir)),
    });

    let static_dir = config.static_dir.clone();
    info!("Starting Web Server at http://{}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(routes)
            .service(actix_files::Files::new("/static", static_dir.clone()))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
